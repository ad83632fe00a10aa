use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serialsheet::{Alphabet, DEFAULT_SERIAL_LENGTH, PageSize, RenderOptions, StickerGeometry};
use std::path::PathBuf;

/// Runtime configuration for the `serialsheet` binary.
///
/// Every option can also be supplied through the environment (a `.env` file
/// in the working directory is loaded first), so batch jobs can be scripted
/// without long command lines.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "serialsheet",
    version,
    about = "Generate unique serial batches and lay them out on printable sticker sheets"
)]
pub struct CliArgs {
    /// Log output format. Logs go to stderr.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the built-in sticker geometries.
    Presets,

    /// Generate a batch and write its CSV, layout and sheet manifest.
    Generate(GenerateArgs),

    /// Lay out previously generated serials (one per line) and print the
    /// placements as JSON.
    Layout(LayoutArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Number of serials to generate.
    #[arg(short = 'n', long)]
    pub count: usize,

    /// Batch name. Defaults to `Batch <timestamp>`.
    #[arg(long)]
    pub name: Option<String>,

    /// Identifier assigned to the batch; names its output folder. Defaults to
    /// one more than the highest numbered folder under `--out-dir`.
    #[arg(long)]
    pub batch_id: Option<u64>,

    /// Overwrite the output of an existing batch with the same id.
    #[arg(long, default_value_t = false)]
    pub force: bool,

    /// Symbols per serial.
    ///
    /// Environment variable: `SERIAL_LENGTH`
    #[arg(long, env = "SERIAL_LENGTH", default_value_t = DEFAULT_SERIAL_LENGTH)]
    pub length: usize,

    /// Character set serials are drawn from.
    #[arg(long, value_enum, default_value_t = AlphabetArg::Alphanumeric)]
    pub alphabet: AlphabetArg,

    /// Root folder for batch output; each batch writes to `<out-dir>/<batch-id>/`.
    ///
    /// Environment variable: `OUT_DIR`
    #[arg(long, env = "OUT_DIR", default_value = "data/batches")]
    pub out_dir: PathBuf,

    /// Threads used to encode symbols.
    ///
    /// Environment variable: `RENDER_WORKERS`
    #[arg(long, env = "RENDER_WORKERS", default_value_t = num_cpus::get())]
    pub workers: usize,

    /// Do not print the serial under each symbol.
    #[arg(long, default_value_t = false)]
    pub no_labels: bool,

    #[command(flatten)]
    pub sticker: StickerArgs,
}

#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// File with one serial per line. Blank lines and `#` comments are skipped.
    #[arg(short, long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub sticker: StickerArgs,
}

/// Sticker geometry selection: a preset, optionally with overrides.
#[derive(Args, Debug, Clone)]
pub struct StickerArgs {
    /// Preset to start from (see `serialsheet presets`).
    ///
    /// Environment variable: `STICKER`
    #[arg(long, env = "STICKER", default_value = "1in x 1in")]
    pub sticker: String,

    /// Rename the geometry; the sheet file name is derived from it.
    #[arg(long)]
    pub sticker_name: Option<String>,

    /// Sticker width in millimetres.
    #[arg(long)]
    pub width: Option<f64>,

    /// Sticker height in millimetres.
    #[arg(long)]
    pub height: Option<f64>,

    /// Left margin and horizontal gap in millimetres.
    #[arg(long)]
    pub margin_x: Option<f64>,

    /// Top margin and vertical gap in millimetres.
    #[arg(long)]
    pub margin_y: Option<f64>,

    /// Rows per page.
    #[arg(long)]
    pub rows: Option<usize>,

    /// Columns per page.
    #[arg(long)]
    pub cols: Option<usize>,

    /// Page size: `a4` or `letter`.
    ///
    /// Environment variable: `PAGE_SIZE`
    #[arg(long, env = "PAGE_SIZE", default_value = "a4")]
    pub page: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphabetArg {
    /// `A-Z0-9`, 36 symbols.
    Alphanumeric,
    /// Crockford base32, 32 symbols without `I L O U`.
    Crockford,
}

impl From<AlphabetArg> for Alphabet {
    fn from(arg: AlphabetArg) -> Self {
        match arg {
            AlphabetArg::Alphanumeric => Self::ALPHANUMERIC,
            AlphabetArg::Crockford => Self::CROCKFORD,
        }
    }
}

/// Validated configuration, one variant per subcommand.
#[derive(Debug, Clone)]
pub enum Config {
    Presets,
    Generate(GenerateConfig),
    Layout(LayoutConfig),
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub count: usize,
    pub name: Option<String>,
    pub batch_id: Option<u64>,
    pub force: bool,
    pub length: usize,
    pub alphabet: Alphabet,
    pub out_dir: PathBuf,
    pub render: RenderOptions,
    pub geometry: StickerGeometry,
    pub page: PageSize,
}

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub input: PathBuf,
    pub geometry: StickerGeometry,
    pub page: PageSize,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        match args.command {
            Command::Presets => Ok(Self::Presets),
            Command::Generate(args) => GenerateConfig::try_from(args).map(Self::Generate),
            Command::Layout(args) => {
                let (geometry, page) = args.sticker.resolve()?;
                Ok(Self::Layout(LayoutConfig {
                    input: args.input,
                    geometry,
                    page,
                }))
            }
        }
    }
}

impl TryFrom<GenerateArgs> for GenerateConfig {
    type Error = anyhow::Error;

    fn try_from(args: GenerateArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("--count must be greater than 0");
        }
        if args.length == 0 {
            bail!("SERIAL_LENGTH must be greater than 0");
        }
        if args.workers == 0 {
            bail!("RENDER_WORKERS must be greater than 0");
        }

        let alphabet = Alphabet::from(args.alphabet);
        let capacity = alphabet.capacity(args.length);
        if args.count as u128 > capacity {
            bail!(
                "--count ({}) exceeds the {} distinct serials of length {}",
                args.count,
                capacity,
                args.length
            );
        }

        let (geometry, page) = args.sticker.resolve()?;
        Ok(Self {
            count: args.count,
            name: args.name,
            batch_id: args.batch_id,
            force: args.force,
            length: args.length,
            alphabet,
            out_dir: args.out_dir,
            render: RenderOptions::default()
                .with_workers(args.workers)
                .with_labels(!args.no_labels),
            geometry,
            page,
        })
    }
}

impl StickerArgs {
    /// Applies the overrides to the chosen preset and validates the result.
    pub fn resolve(self) -> anyhow::Result<(StickerGeometry, PageSize)> {
        let Some(mut geometry) = StickerGeometry::preset(&self.sticker) else {
            let known: Vec<_> = StickerGeometry::presets()
                .into_iter()
                .map(|g| g.name)
                .collect();
            bail!(
                "unknown sticker preset {:?}; expected one of {:?}",
                self.sticker,
                known
            );
        };

        if let Some(name) = self.sticker_name {
            geometry.name = name;
        }
        geometry.width = self.width.unwrap_or(geometry.width);
        geometry.height = self.height.unwrap_or(geometry.height);
        geometry.margin_x = self.margin_x.unwrap_or(geometry.margin_x);
        geometry.margin_y = self.margin_y.unwrap_or(geometry.margin_y);
        geometry.rows = self.rows.unwrap_or(geometry.rows);
        geometry.cols = self.cols.unwrap_or(geometry.cols);
        geometry
            .validate()
            .with_context(|| format!("invalid sticker geometry {:?}", geometry.name))?;

        let Some(page) = PageSize::from_name(&self.page) else {
            bail!("unknown page size {:?}; expected `a4` or `letter`", self.page);
        };
        Ok((geometry, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> anyhow::Result<Config> {
        let args = CliArgs::try_parse_from(std::iter::once("serialsheet").chain(argv.iter().copied()))?;
        Config::try_from(args)
    }

    fn generate(argv: &[&str]) -> GenerateConfig {
        match parse(argv).unwrap() {
            Config::Generate(config) => config,
            other => panic!("expected generate config, got {other:?}"),
        }
    }

    #[test]
    fn generate_defaults_to_first_preset_on_a4() {
        let config = generate(&["generate", "-n", "100", "--length", "10", "--workers", "2"]);
        assert_eq!(config.count, 100);
        assert_eq!(config.length, 10);
        assert_eq!(config.geometry, StickerGeometry::preset("1in x 1in").unwrap());
        assert_eq!(config.page, PageSize::A4);
        assert_eq!(config.render.workers, 2);
        assert!(config.render.labels);
        assert_eq!(config.batch_id, None);
        assert!(!config.force);
    }

    #[test]
    fn explicit_batch_id_and_force() {
        let config = generate(&["generate", "-n", "3", "--batch-id", "12", "--force"]);
        assert_eq!(config.batch_id, Some(12));
        assert!(config.force);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let config = generate(&[
            "generate", "-n", "5", "--sticker", "65 x 25mm", "--rows", "2", "--margin-x", "0",
            "--sticker-name", "tiny", "--no-labels", "--page", "letter",
        ]);
        assert_eq!(config.geometry.name, "tiny");
        assert_eq!(config.geometry.rows, 2);
        assert_eq!(config.geometry.cols, 3);
        assert_eq!(config.geometry.margin_x, 0.0);
        assert_eq!(config.page, PageSize::LETTER);
        assert!(!config.render.labels);
    }

    #[test]
    fn rejects_zero_count_and_workers() {
        assert!(parse(&["generate", "-n", "0"]).is_err());
        assert!(parse(&["generate", "-n", "3", "--workers", "0"]).is_err());
    }

    #[test]
    fn rejects_count_beyond_serial_space() {
        let err = parse(&["generate", "-n", "40", "--length", "1"]).unwrap_err();
        assert!(err.to_string().contains("exceeds"), "{err}");
    }

    #[test]
    fn rejects_unknown_preset_and_page() {
        assert!(parse(&["generate", "-n", "3", "--sticker", "nope"]).is_err());
        assert!(parse(&["generate", "-n", "3", "--page", "a3"]).is_err());
    }

    #[test]
    fn rejects_invalid_geometry_override() {
        assert!(parse(&["generate", "-n", "3", "--rows", "0"]).is_err());
        assert!(parse(&["generate", "-n", "3", "--width=-2"]).is_err());
    }

    #[test]
    fn crockford_alphabet_is_selectable() {
        let config = generate(&["generate", "-n", "3", "--alphabet", "crockford"]);
        assert_eq!(config.alphabet, Alphabet::CROCKFORD);
    }

    #[test]
    fn layout_subcommand_resolves_geometry() {
        match parse(&["layout", "--input", "serials.txt", "--sticker", "2in x 1in"]).unwrap() {
            Config::Layout(config) => {
                assert_eq!(config.input, PathBuf::from("serials.txt"));
                assert_eq!(config.geometry.cols, 2);
            }
            other => panic!("expected layout config, got {other:?}"),
        }
    }
}
