//! Primary output resolution via the RandR extension

use std::fmt::Display;

use tracing::debug;
use x11rb::connection::Connection;
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::xproto::Window;

use crate::error::{NativeError, Result};

fn failed<E: Display>(step: &'static str) -> impl FnOnce(E) -> NativeError {
    move |e| NativeError::PrimaryOutput {
        step,
        reason: e.to_string(),
    }
}

/// Size of the active mode on the primary output of the screen owning `root`.
///
/// Walks screen resources, primary output, output info and finally the CRTC
/// driving that output.
pub fn primary_output_size<C: Connection>(conn: &C, root: Window) -> Result<(u16, u16)> {
    const RESOURCES: &str = "get screen resources";
    const PRIMARY: &str = "get primary output";
    const OUTPUT: &str = "get output info for primary output";
    const CRTC: &str = "get CRTC info for the primary output";

    let resources = conn
        .randr_get_screen_resources(root)
        .map_err(failed(RESOURCES))?
        .reply()
        .map_err(failed(RESOURCES))?;

    let primary = conn
        .randr_get_output_primary(root)
        .map_err(failed(PRIMARY))?
        .reply()
        .map_err(failed(PRIMARY))?
        .output;
    if primary == x11rb::NONE {
        return Err(failed(PRIMARY)("no primary output is set"));
    }

    let output = conn
        .randr_get_output_info(primary, resources.config_timestamp)
        .map_err(failed(OUTPUT))?
        .reply()
        .map_err(failed(OUTPUT))?;
    if output.crtc == x11rb::NONE {
        return Err(failed(CRTC)("primary output is not driven by a CRTC"));
    }

    let crtc = conn
        .randr_get_crtc_info(output.crtc, resources.config_timestamp)
        .map_err(failed(CRTC))?
        .reply()
        .map_err(failed(CRTC))?;

    debug!(
        "Primary output 0x{:x} on CRTC 0x{:x}: {}x{}",
        primary, output.crtc, crtc.width, crtc.height
    );
    Ok((crtc.width, crtc.height))
}
