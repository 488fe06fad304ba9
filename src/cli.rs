use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("platecam")
        .version("0.1.0")
        .about("Still photo capture for a Raspberry Pi IMX477 camera, one photo per invocation.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom configuration file")
                .action(ArgAction::Set)
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
        )
        .subcommand(
            Command::new("capture")
                .about("Captures a single still photo")
                .arg(Arg::new("preset").short('p').long("preset").value_name("PRESET").help("Quality preset: production, high_quality or fast (default: from config)").action(ArgAction::Set))
                .arg(Arg::new("output").short('o').long("output").value_name("DIR").help("Base output directory for photos").action(ArgAction::Set))
        )
        .subcommand(
            Command::new("burst")
                .about("Captures several photos in quick succession")
                .arg(Arg::new("preset").short('p').long("preset").value_name("PRESET").help("Quality preset: production, high_quality or fast (default: from config)").action(ArgAction::Set))
                .arg(Arg::new("count").long("count").value_name("N").help("Number of photos to capture").value_parser(clap::value_parser!(u32)).action(ArgAction::Set))
                .arg(Arg::new("delay").long("delay").value_name("MILLIS").help("Delay between shots in milliseconds").value_parser(clap::value_parser!(u64)).action(ArgAction::Set))
                .arg(Arg::new("output").short('o').long("output").value_name("DIR").help("Base output directory for photos").action(ArgAction::Set))
        )
        .subcommand(
            Command::new("diagnose")
                .about("Runs a diagnostic test suite against the camera stack and photo store")
                .arg(Arg::new("capture").long("capture").help("Also run a full end-to-end test capture").action(ArgAction::SetTrue))
        )
}
