use std::{error::Error, io::Write, path::PathBuf, process::ExitCode};

use tracing::info;
use tracing_subscriber::EnvFilter;

use rayconf::{
    cli::{Cli, Commands, parse_args},
    config::{Config, load_config},
    supervisor::{ServiceSpec, ServiceSupervisor},
    transform::ConfigGenerator,
};

fn main() -> ExitCode {
    let args = parse_args();
    init_logging(&args);

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Each error's message already embeds its cause.
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Generate {
            config,
            output,
            dry_run,
        } => {
            let config = load_config(config.as_deref())?;
            let destination = output
                .map(PathBuf::from)
                .unwrap_or_else(|| config.output_path());
            let generator = ConfigGenerator::new(destination);
            let proxy = config.proxy()?;

            if dry_run {
                let content = generator.transform(&proxy.settings)?;
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&content)?;
                writeln!(stdout)?;
            } else {
                generator.write(&proxy.settings)?;
                println!("Wrote {}", generator.destination().display());
            }
        }
        Commands::Status { config, service } => {
            let config = load_config(config.as_deref())?;
            let names = match service {
                Some(name) => {
                    config.service(&name)?;
                    vec![name]
                }
                None => config
                    .service_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            };

            if names.is_empty() {
                info!("No services defined in config");
            }
            for name in names {
                let running = build_supervisor(&config, &name)?.is_running()?;
                println!("{name}: {}", if running { "running" } else { "stopped" });
            }
        }
        Commands::Stop { config, service } => {
            let config = load_config(config.as_deref())?;
            let supervisor = build_supervisor(&config, &service)?;
            supervisor.stop()?;
            println!("{service}: stopped");
        }
    }

    Ok(())
}

fn init_logging(args: &Cli) {
    let filter = if let Some(level) = args.log_level {
        EnvFilter::new(level.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_supervisor(
    config: &Config,
    name: &str,
) -> Result<ServiceSupervisor, Box<dyn Error>> {
    let service = config.service(name)?;
    Ok(ServiceSupervisor::new(ServiceSpec::from_config(name, service)))
}
