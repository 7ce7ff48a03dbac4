use quill::settings::*;

fn main() -> anyhow::Result<()> {
    // Load settings from the default location (optional file)
    let settings = parse_settings(None)?;
    println!("Loaded settings: {:?}", settings);

    // Attempt to load from an invalid path (expected to fail)
    let is_err = parse_settings(Some("")).is_err();
    println!("Error on invalid path: {:?}", is_err);

    // Attempt to load from a custom path, then apply the command line
    // $ cargo run --bin settings_demo -- --settings=settings/dev.toml --debug
    let cli = Cli::parse();
    let mut settings = parse_settings(cli.settings.as_deref())?;
    settings.apply_cli(&cli);
    println!("Effective settings: {:?}", settings);
    Ok(())
}
