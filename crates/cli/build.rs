use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("glossa")
        .version("0.1.0")
        .author("Glossa Contributors")
        .about("Split news articles into paragraphs, sentences and words")
        .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(clap::arg!(--url <URL> "Source URL of file or stdin input").value_name("URL"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (json, text, tree)")
                .value_name("FORMAT")
                .default_value("json")
                .value_parser(["json", "text", "tree"]),
        )
        .arg(clap::arg!(--pretty "Pretty-print JSON output"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(--min_score <SCORE> "Minimum score the main content block must reach").default_value("10"))
        .arg(clap::arg!(--strict "Fail instead of falling back when no block reaches --min-score"))
        .arg(clap::arg!(--char_threshold <NUM> "Character threshold for content candidates").default_value("500"))
        .arg(clap::arg!(-v --verbose "Enable debug logging (honours RUST_LOG)"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "glossa", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "glossa", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "glossa", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "glossa", &completions_dir).unwrap();

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
}
