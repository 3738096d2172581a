use clap::Parser;
use miette::Result;
use tracing_subscriber::{fmt, EnvFilter};
use trainreg::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(global.verbose);

    match cli.command {
        Commands::Init(args) => trainreg::cli::commands::init::run(args, &global),
        Commands::Add(args) => trainreg::cli::commands::add::run(args, &global),
        Commands::List(args) => trainreg::cli::commands::list::run(args, &global),
        Commands::Show(args) => trainreg::cli::commands::show::run(args, &global),
        Commands::Edit(args) => trainreg::cli::commands::edit::run(args, &global),
        Commands::Delete(args) => trainreg::cli::commands::delete::run(args, &global),
        Commands::Summary(args) => trainreg::cli::commands::summary::run(args, &global),
        Commands::Chart(args) => trainreg::cli::commands::chart::run(args, &global),
        Commands::Export(args) => trainreg::cli::commands::export::run(args, &global),
        Commands::Report(args) => trainreg::cli::commands::report::run(args, &global),
        Commands::Completions(args) => trainreg::cli::commands::completions::run(args),
    }
}

/// Log to stderr; RUST_LOG wins unless --verbose asks for debug
fn init_logging(verbose: bool) {
    let env = if verbose {
        EnvFilter::new("trainreg=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
