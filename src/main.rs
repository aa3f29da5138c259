use clap::{Parser, Subcommand};
use streamsx_graph::render;
use streamsx_graph::spec::TopologySpec;
use streamsx_graph::spl::ident;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "streamsx-graph")]
#[command(about = "IBM Streams application graph generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a graph from a topology description and emit its JSON.
    Generate {
        #[arg(long)]
        topology: String,

        /// Output file, stdout when absent.
        #[arg(short = 'o', long)]
        out: Option<String>,

        #[arg(long)]
        compact: bool,
    },
    /// Print sanitized SPL identifiers.
    Ident {
        #[command(subcommand)]
        cmd: IdentCommands,
    },
}

#[derive(Subcommand)]
enum IdentCommands {
    /// Sanitize a dotted namespace.
    Namespace {
        namespace: String,

        #[arg(long, default_value = "app")]
        default: String,
    },
    /// Runtime identifier of an operator or port name.
    RuntimeId {
        #[arg(long)]
        kind: String,

        name: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Generate {
            topology,
            out,
            compact,
        } => {
            // 1) Parse + validate the topology description.
            let spec = TopologySpec::from_path(&topology)?;
            let mut graph = spec.validate_and_build()?;

            // 2) Generate.
            let doc = graph.generate_spl_graph()?;

            // 3) Render.
            let text = render::render_graph_json(&doc, compact)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    info!(path = %path, "wrote graph");
                }
                None => print!("{}", text),
            }
        }
        Commands::Ident { cmd } => match cmd {
            IdentCommands::Namespace { namespace, default } => {
                println!("{}", ident::fix_namespace(&namespace, &default));
            }
            IdentCommands::RuntimeId { kind, name } => {
                println!("{}", ident::runtime_id(&kind, &name));
            }
        },
    }

    Ok(())
}
