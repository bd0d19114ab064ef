use clap::{Parser, error::ErrorKind};

use testaustime_cli::{
    Res,
    api::ApiClient,
    args::{Cli, ParsedInvocation},
    config::{self, FileConfig},
    dispatcher::Dispatcher,
    failure,
    grammar::Grammar,
    output::Printer,
    prompt::TerminalPrompt,
    render,
    resolver::{Resolution, Resolver},
    warning,
};

fn run(invocation: ParsedInvocation, out: Printer) -> Res<()> {
    let grammar = Grammar::build()?;

    // usage never touches the configuration or the network
    let route = match Resolver::new(&grammar).resolve(&invocation) {
        Resolution::Usage(fallback) => {
            println!("{}", render::usage(&fallback, &out));
            return Ok(());
        }
        Resolution::Route(route) => route,
    };

    if let Err(e) = config::load_env() {
        warning!(out, "Cannot load environment. Err: {}", e);
    }

    let mut store = FileConfig::load(invocation.flags.alternate_config_file.as_deref())?;
    let mut api = ApiClient::new(&store.config(), invocation.flags.measure_requests, out)?;
    let mut prompt = TerminalPrompt;

    Dispatcher::new(&mut api, &mut prompt, &mut store, out).run(&route)
}

fn main() {
    let invocation = match Cli::try_parse() {
        Ok(cli) => ParsedInvocation::from(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        // anything clap cannot make sense of shows the top-level usage
        Err(_) => ParsedInvocation::lenient(std::env::args().skip(1)),
    };

    let out = Printer::new(!invocation.flags.disable_colors);
    if let Err(e) = run(invocation, out) {
        failure!(out, "{}", e);
        std::process::exit(1);
    }
}
