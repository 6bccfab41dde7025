use std::{env, fs, path::PathBuf};

fn source_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(clap::arg!(--text "Treat a file or stdin input as plain article text instead of HTML"))
        .arg(clap::arg!(--title <TITLE> "Title to use instead of the extracted one"))
        .arg(clap::arg!(--date <DATE> "Publication date to use instead of the extracted one"))
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("referent")
        .version("1.0.0")
        .author("Referent Contributors")
        .about("Turn web articles into translations, summaries, posts and illustrations")
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds for page fetches").default_value("30").global(true))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for page fetches").global(true))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .global(true),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging").global(true))
        .subcommand(
            clap::Command::new("parse")
                .about("Extract title, date and content as JSON")
                .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin")),
        )
        .subcommand(source_args(clap::Command::new("translate").about("Translate the article into Russian")))
        .subcommand(source_args(clap::Command::new("summary").about("Summarize the article in two or three paragraphs")))
        .subcommand(source_args(clap::Command::new("theses").about("List the key theses of the article")))
        .subcommand(source_args(clap::Command::new("post").about("Write a Telegram post about the article")))
        .subcommand(source_args(clap::Command::new("image-prompt").about("Write an English prompt for an image model")))
        .subcommand(source_args(clap::Command::new("illustrate").about("Write an image prompt and render it")))
        .subcommand(
            clap::Command::new("image")
                .about("Render an image from a prompt")
                .arg(clap::arg!(<PROMPT> "Prompt for the image model")),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "referent", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "referent", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "referent", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "referent", &completions_dir).unwrap();

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
}
