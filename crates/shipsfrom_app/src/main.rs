#[cfg(not(target_arch = "wasm32"))]
mod platform;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    platform::run_cli()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
