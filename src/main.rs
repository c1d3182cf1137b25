/// Headless compositor for native builds.
///
/// Renders a stored scene snapshot over its image:
/// `shotmark-render <image> <snapshot.json> <out.png> [scale]`
#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use shotmark::EditorConfig;

    let config = EditorConfig::load_from_default_path().unwrap_or_default();
    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (image, snapshot, output, scale) = match args.as_slice() {
        [image, snapshot, output] => (image, snapshot, output, None),
        [image, snapshot, output, scale] => (image, snapshot, output, Some(scale)),
        _ => {
            eprintln!("Usage: shotmark-render <image> <snapshot.json> <out.png> [scale]");
            return std::process::ExitCode::from(2);
        }
    };

    match render::run(image, snapshot, output, scale.map(String::as_str)) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Render error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod render {
    use std::path::Path;

    use shotmark::SceneState;
    use shotmark::export::{ExportOptions, export_png};

    /// Errors surfaced by the command line.
    #[derive(Debug, thiserror::Error)]
    pub enum CliError {
        #[error("Failed to read {path}: {source}")]
        Read {
            path: String,
            source: std::io::Error,
        },

        #[error("Invalid snapshot: {0}")]
        Snapshot(#[from] serde_json::Error),

        #[error("Invalid scale '{0}'")]
        Scale(String),

        #[error(transparent)]
        Export(#[from] shotmark::ExportError),

        #[error("Failed to write output: {0}")]
        Write(std::io::Error),
    }

    fn read(path: &str) -> Result<Vec<u8>, CliError> {
        std::fs::read(Path::new(path)).map_err(|source| CliError::Read {
            path: path.to_string(),
            source,
        })
    }

    pub fn run(
        image: &str,
        snapshot: &str,
        output: &str,
        scale: Option<&str>,
    ) -> Result<(), CliError> {
        let image_bytes = read(image)?;
        let state: SceneState = serde_json::from_slice(&read(snapshot)?)?;

        let mut options = ExportOptions::default();
        if let Some(scale) = scale {
            let value = scale
                .parse::<f64>()
                .map_err(|_| CliError::Scale(scale.to_string()))?;
            options = options.with_scale(value);
        }

        log::debug!(
            "Rendering {} object(s) from {} over {}",
            state.objects().len(),
            snapshot,
            image
        );
        let png = export_png(&image_bytes, state.objects(), &options)?;
        std::fs::write(output, png).map_err(CliError::Write)?;
        log::info!("Wrote {}", output);
        Ok(())
    }
}

// WASM builds drive the library from JavaScript
#[cfg(target_arch = "wasm32")]
fn main() {}
