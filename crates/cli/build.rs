use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let sensors = [
        "Bayer",
        "EXR-CMOS",
        "GFX",
        "X-Trans-I",
        "X-Trans-II",
        "X-Trans-III",
        "X-Trans-IV",
        "X-Trans-V",
    ];

    let mut cmd = clap::Command::new("simrecipe")
        .version(env!("CARGO_PKG_VERSION"))
        .author("simrecipe Contributors")
        .about("Turn film simulation recipe pages into FP1 camera profiles")
        .subcommand_required(true)
        .arg(clap::arg!(-v --verbose "Enable debug logging").global(true))
        .subcommand(
            clap::Command::new("scrape")
                .about("Scrape every recipe of the selected sensors into FP1 files")
                .arg(
                    clap::arg!(-s --sensor <SENSOR> "Sensor families to scrape")
                        .action(clap::ArgAction::Append)
                        .value_parser(sensors),
                )
                .arg(
                    clap::arg!(-o --output <DIR> "Output directory for rendered profiles")
                        .default_value("fuji_profiles")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    clap::arg!(--cache_dir <DIR> "Directory of the processed URL cache")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(clap::arg!(--template <FILE> "Custom FP1 template file"))
                .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("10"))
                .arg(clap::arg!(--concurrency <NUM> "Recipes processed at the same time").default_value("4"))
                .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests"))
                .arg(clap::arg!(--json "Print the batch report as JSON")),
        )
        .subcommand(
            clap::Command::new("parse")
                .about("Parse a single recipe page")
                .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
                .arg(clap::arg!(--fp1 "Render an FP1 document instead of JSON"))
                .arg(clap::arg!(--name <NAME> "Recipe name written into the FP1 header"))
                .arg(
                    clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("10")),
        )
        .subcommand(
            clap::Command::new("sensors")
                .about("List sensor families, their index pages and cameras")
                .arg(clap::arg!(-m --model <MODEL> "Only sensors used by this camera model (e.g. X-T4)"))
                .arg(clap::arg!(--json "Print as JSON")),
        );

    for shell in [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ] {
        clap_complete::generate_to(shell, &mut cmd, "simrecipe", &completions_dir).unwrap();
    }

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
}
