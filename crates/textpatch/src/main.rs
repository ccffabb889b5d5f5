use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = textpatch::cli::Cli::parse();
    textpatch::init(cli.verbose);

    textpatch::cli::run(cli)
}
