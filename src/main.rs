use std::path::{Path, PathBuf};

use clap::Parser;

use underwater_enhance::{compare, enhance_with_config, image_statistics, io, EnhanceConfig};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "underwater-enhance")]
#[command(about = "Underwater image enhancement: gray-world white balance + CLAHE in Lab space")]
#[command(version)]
struct Cli {
    /// Path to input underwater image
    #[arg(long)]
    input: PathBuf,

    /// Save original, enhanced and comparison images to --output-dir
    #[arg(long)]
    save_output: bool,

    /// Directory to save output images
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// CLAHE clip limit (0 disables clipping)
    #[arg(long)]
    clip_limit: Option<f32>,

    /// CLAHE tiles per side
    #[arg(long)]
    tile_grid: Option<u32>,

    /// Upper bound of the white balance gains
    #[arg(long)]
    max_gain: Option<f32>,

    /// Lift the red channel from green before white balance
    #[arg(long)]
    compensate_red: bool,
}

impl Cli {
    fn to_config(&self) -> CliResult<EnhanceConfig> {
        let mut config = EnhanceConfig::default();

        if let Some(clip_limit) = self.clip_limit {
            config.contrast.clip_limit = clip_limit;
        }
        if let Some(tiles) = self.tile_grid {
            config.contrast.tiles_x = tiles;
            config.contrast.tiles_y = tiles;
        }
        if let Some(max_gain) = self.max_gain {
            config.white_balance.max_gain = max_gain;
        }
        if self.compensate_red {
            config.white_balance.compensate_red = true;
        }

        config.validate()?;
        Ok(config)
    }
}

fn save(image: &underwater_enhance::BgrImage, dir: &Path, name: String) -> CliResult<PathBuf> {
    let path = dir.join(name);
    io::save_bgr(image, &path)?;
    Ok(path)
}

fn run(cli: &Cli) -> CliResult<()> {
    let config = cli.to_config()?;

    println!("\nProcessing: {}", cli.input.display());
    let original = io::load_bgr(&cli.input)?;
    println!("Image size: {}x{}", original.width(), original.height());

    println!("\nOriginal Statistics:\n{}", image_statistics(&original));
    let enhanced = enhance_with_config(&original, &config)?;
    println!("\nEnhanced Statistics:\n{}", image_statistics(&enhanced));

    if !cli.save_output {
        println!("\nProcessing complete (use --save-output to write images)");
        return Ok(());
    }

    std::fs::create_dir_all(&cli.output_dir)?;
    let stem = cli
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let comparison = compare::side_by_side(&original, &enhanced)?;
    let path = save(&comparison, &cli.output_dir, format!("{}_comparison.jpg", stem))?;
    println!("\nSaved comparison: {}", path.display());

    let path = save(&original, &cli.output_dir, format!("{}_original.jpg", stem))?;
    println!("Saved original: {}", path.display());
    let path = save(&enhanced, &cli.output_dir, format!("{}_enhanced.jpg", stem))?;
    println!("Saved enhanced: {}", path.display());

    println!(
        "\nProcessing complete! All images saved to '{}'",
        cli.output_dir.display()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "underwater-enhance",
            "--input",
            "reef.jpg",
            "--clip-limit",
            "3.5",
            "--tile-grid",
            "4",
            "--compensate-red",
        ]);
        let config = cli.to_config().unwrap();

        assert_eq!(config.contrast.clip_limit, 3.5);
        assert_eq!((config.contrast.tiles_x, config.contrast.tiles_y), (4, 4));
        assert!(config.white_balance.compensate_red);
        assert_eq!(config.white_balance.max_gain, 4.0);
    }

    #[test]
    fn test_no_flags_gives_defaults() {
        let cli = Cli::parse_from(["underwater-enhance", "--input", "reef.jpg"]);
        assert_eq!(cli.to_config().unwrap(), EnhanceConfig::default());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli =
            Cli::parse_from(["underwater-enhance", "--input", "reef.jpg", "--tile-grid", "0"]);
        assert!(cli.to_config().is_err());
    }

    #[test]
    fn test_config_file_flags_are_rejected() {
        for flag in ["--config", "--write-config"] {
            let parsed =
                Cli::try_parse_from(["underwater-enhance", "--input", "reef.jpg", flag, "x.json"]);
            assert!(parsed.is_err(), "{flag} should not be accepted");
        }
    }
}
