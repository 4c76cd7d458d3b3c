use clap::{Args, Parser, Subcommand};
use reqwest::header::HeaderMap;

use trace_chain::trace::{read_headers, write_headers, Tracer};
use trace_chain::TraceIdentity;

#[derive(Parser)]
#[command(name = "trace-cli")]
#[command(about = "Inspect and exercise trace-chain identities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a fresh root identity and its headers
    Root,
    /// Print the child of the given identity and its headers
    Chain(IdentityArgs),
    /// Send a request to a hop and print the identity it reports
    Probe {
        url: String,
        #[command(flatten)]
        identity: IdentityArgs,
    },
}

#[derive(Args)]
struct IdentityArgs {
    #[arg(long, default_value = "")]
    entry: String,
    #[arg(long, default_value = "")]
    curr: String,
    #[arg(long, default_value = "")]
    prev: String,
}

impl IdentityArgs {
    fn identity(&self) -> TraceIdentity {
        TraceIdentity::new(&*self.entry, &*self.curr, &*self.prev)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let tracer = Tracer::default();

    match cli.command {
        Commands::Root => {
            print_identity(&tracer.new_root())?;
        }
        Commands::Chain(args) => {
            let child = tracer.chain(&args.identity())?;
            print_identity(&child)?;
        }
        Commands::Probe { url, identity } => {
            let identity = identity.identity();
            let mut headers = HeaderMap::new();
            if identity.is_valid() {
                write_headers(&identity, &mut headers);
            }

            let res = reqwest::Client::new().get(&url).headers(headers).send().await?;
            let status = res.status();
            let reported = read_headers(res.headers());
            if !status.is_success() {
                eprintln!("Error: hop returned status {}", status);
                if let Ok(text) = res.text().await {
                    eprintln!("Response: {}", text);
                }
                return Ok(());
            }

            println!("{}", res.text().await?);
            if reported.is_valid() {
                eprintln!("responding hop: {}", describe(&reported));
            }
        }
    }

    Ok(())
}

fn describe(identity: &TraceIdentity) -> String {
    if identity.is_root() {
        format!("{} (root)", identity)
    } else {
        identity.to_string()
    }
}

fn print_identity(identity: &TraceIdentity) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(identity)?);
    eprintln!("{}", describe(identity));

    let mut headers = HeaderMap::new();
    write_headers(identity, &mut headers);
    for (name, value) in headers.iter() {
        println!("{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
    }
    Ok(())
}
