use std::path::PathBuf;

use canape::{
    BolsterSet, Chaise, CushionSpec, Dimensions, Layout, Palette, PaletteSpec, Report, Shape,
    Side, SofaRequest, Structure, VariantChoice,
};
use clap::{Args, Parser, Subcommand};
use miette::{Context, IntoDiagnostic, miette};

#[derive(Parser)]
#[command(name = "canape")]
#[command(about = "Sofa floor plans: seats, backrests, armrests and cushions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the text report of a layout
    Layout {
        #[command(flatten)]
        request: RequestArgs,

        /// Also list the metrics of every candidate variant
        #[arg(long)]
        candidates: bool,
    },

    /// Draw the floor plan as SVG
    Svg {
        #[command(flatten)]
        request: RequestArgs,

        /// Colors, e.g. "accoudoirs:gris foncé; coussins:#8B7E74"
        #[arg(long)]
        colors: Option<String>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dump the full layout as JSON
    Json {
        #[command(flatten)]
        request: RequestArgs,

        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// Read the request from a JSON file; other flags override its fields
    #[arg(long)]
    request: Option<PathBuf>,

    /// Shape family: s1, lnf, lf, u, u1f, u2f
    #[arg(short, long, value_parser = parse_shape, required_unless_present = "request")]
    shape: Option<Shape>,

    /// Overall width (tx) in cm
    #[arg(short, long, required_unless_present = "request")]
    width: Option<f64>,

    /// Left branch height (ty) in cm, L and U shapes
    #[arg(long)]
    left_height: Option<f64>,

    /// Right branch height (tz) in cm, U shapes
    #[arg(long)]
    right_height: Option<f64>,

    /// Seat depth in cm
    #[arg(short, long)]
    depth: Option<f64>,

    /// Variant: auto, v1, v2, v3, v4
    #[arg(long, value_parser = parse_variant)]
    variant: Option<VariantChoice>,

    /// Side without backrest (g, b, d); repeatable
    #[arg(long, value_parser = parse_side)]
    no_backrest: Vec<Side>,

    /// Side without armrest (g, b, d); repeatable
    #[arg(long, value_parser = parse_side)]
    no_armrest: Vec<Side>,

    /// Chaise as side:length, e.g. "d:90"
    #[arg(long, value_parser = parse_chaise)]
    chaise: Option<Chaise>,

    /// Cushion sizing: auto, 80, valise, p, g, s, 70-80, 70-80:s
    #[arg(short, long)]
    cushions: Option<String>,

    /// Bolster sides, e.g. "g,d"
    #[arg(short, long)]
    bolsters: Option<String>,
}

fn parse_shape(s: &str) -> Result<Shape, String> {
    Shape::from_code(s).ok_or_else(|| format!("unknown shape `{s}` (expected s1, lnf, lf, u, u1f, u2f)"))
}

fn parse_variant(s: &str) -> Result<VariantChoice, String> {
    VariantChoice::from_code(s).ok_or_else(|| format!("unknown variant `{s}`"))
}

fn parse_side(s: &str) -> Result<Side, String> {
    Side::from_code(s).ok_or_else(|| format!("unknown side `{s}` (expected g, b or d)"))
}

fn parse_chaise(s: &str) -> Result<Chaise, String> {
    let (side, length) = s
        .split_once(':')
        .ok_or_else(|| format!("expected side:length, got `{s}`"))?;
    let side = parse_side(side)?;
    let length = length
        .trim()
        .parse()
        .map_err(|_| format!("invalid chaise length `{length}`"))?;
    Ok(Chaise { side, length })
}

impl RequestArgs {
    fn dimensions(&self, shape: Shape) -> miette::Result<Dimensions> {
        let width = self.width.ok_or_else(|| miette!("--width is required"))?;
        let left = || {
            self.left_height
                .ok_or_else(|| miette!("--left-height is required for a {shape} sofa"))
        };
        let dims = match shape {
            Shape::Straight => Dimensions::straight(width),
            Shape::LPlain | Shape::LMitred => Dimensions::l_shape(width, left()?),
            Shape::UPlain | Shape::UOneMitre | Shape::UTwoMitres => {
                let right = self
                    .right_height
                    .ok_or_else(|| miette!("--right-height is required for a {shape} sofa"))?;
                Dimensions::u_shape(width, left()?, right)
            }
        };
        Ok(match self.depth {
            Some(depth) => dims.with_depth(depth),
            None => dims,
        })
    }

    fn build(&self) -> miette::Result<SofaRequest> {
        let mut request = match &self.request {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("reading {}", path.display()))?;
                serde_json::from_str::<SofaRequest>(&text)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("parsing {}", path.display()))?
            }
            None => {
                let shape = self.shape.ok_or_else(|| miette!("--shape is required"))?;
                SofaRequest::new(shape, self.dimensions(shape)?)
            }
        };

        if self.request.is_some() {
            if let Some(shape) = self.shape {
                request.shape = shape;
            }
            if self.width.is_some() {
                request.dimensions = self.dimensions(request.shape)?;
            } else if let Some(depth) = self.depth {
                request.dimensions = request.dimensions.with_depth(depth);
            }
        }
        if let Some(variant) = self.variant {
            request.variant = variant;
        }

        let mut structure: Structure = request.structure;
        for &side in &self.no_backrest {
            structure = structure.without_backrest(side);
        }
        for &side in &self.no_armrest {
            structure = structure.without_armrest(side);
        }
        request.structure = structure;

        if let Some(chaise) = self.chaise {
            request.chaise = Some(chaise);
        }
        if let Some(cushions) = &self.cushions {
            request.cushions = CushionSpec::parse(cushions)?;
        }
        if let Some(bolsters) = &self.bolsters {
            request.bolsters = BolsterSet::parse(bolsters)?;
        }
        Ok(request)
    }

    fn layout(&self) -> miette::Result<Layout> {
        let request = self.build()?;
        tracing::debug!(shape = %request.shape, variant = %request.variant, "laying out");
        Ok(canape::layout(&request)?)
    }
}

fn main() -> miette::Result<()> {
    // Logs go to stderr so that svg and json output can be piped
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Layout {
            request,
            candidates,
        } => {
            let layout = request.layout()?;
            println!("{}", Report::from_layout(&layout));
            if candidates {
                for m in &layout.candidates {
                    println!(
                        "  {}: {} banquettes, {} scissions, {} courtes{}",
                        m.variant,
                        m.seat_count,
                        m.splits,
                        m.short_runs,
                        if m.feasible { "" } else { " (hors limite)" }
                    );
                }
            }
        }
        Command::Svg {
            request,
            colors,
            output,
        } => {
            let layout = request.layout()?;
            let spec = match colors {
                Some(colors) => PaletteSpec::parse(&colors)?,
                None => PaletteSpec::default(),
            };
            let svg = canape::render_svg(&layout, &Palette::resolve(&spec));
            match output {
                Some(path) => std::fs::write(&path, svg)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("writing {}", path.display()))?,
                None => print!("{svg}"),
            }
        }
        Command::Json { request, pretty } => {
            let layout = request.layout()?;
            let json = if pretty {
                serde_json::to_string_pretty(&layout)
            } else {
                serde_json::to_string(&layout)
            }
            .into_diagnostic()?;
            println!("{json}");
        }
    }
    Ok(())
}
