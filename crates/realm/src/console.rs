//! Console API implementation
//!
//! Provides console.log, console.warn, console.error, etc. Output goes to
//! the log facade only; the internal realm has no user-facing console.

use rquickjs::{Ctx, Function, Object, Result};

/// Register the console object in the global scope
pub fn register_console(ctx: &Ctx<'_>) -> Result<()> {
    let globals = ctx.globals();

    let console = Object::new(ctx.clone())?;

    console.set(
        "log",
        Function::new(ctx.clone(), |msg: String| {
            log::info!("[realm] {}", msg);
        })?,
    )?;

    console.set(
        "warn",
        Function::new(ctx.clone(), |msg: String| {
            log::warn!("[realm] {}", msg);
        })?,
    )?;

    console.set(
        "error",
        Function::new(ctx.clone(), |msg: String| {
            log::error!("[realm] {}", msg);
        })?,
    )?;

    console.set(
        "info",
        Function::new(ctx.clone(), |msg: String| {
            log::info!("[realm] {}", msg);
        })?,
    )?;

    console.set(
        "debug",
        Function::new(ctx.clone(), |msg: String| {
            log::debug!("[realm] {}", msg);
        })?,
    )?;

    globals.set("console", console)?;

    Ok(())
}
