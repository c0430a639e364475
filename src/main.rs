//! mkdown CLI - render Markdown notes to HTML, Markdown or bookmarks

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use mkdown::{Mkdown, NoteIndex, Options, OutputFormat, WikiLinkFormat};

#[derive(Parser)]
#[command(name = "mkdown")]
#[command(version, about = "Markdown to HTML for note collections", long_about = None)]
#[command(after_help = "EXAMPLES:
    mkdown note.md                          Render an HTML fragment
    mkdown note.md -f doc --title Notes     Render a full HTML page
    cat note.md | mkdown --notes notes.json Resolve [[wiki links]] against an index")]
struct Cli {
    /// Input file; stdin when absent or `-`
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// How note ids are written into link targets
    #[arg(long, value_enum, default_value_t = IdFormat::Common)]
    wiki_format: IdFormat,

    /// Leave [[...]] as plain text
    #[arg(long)]
    no_double_brackets: bool,

    /// JSON array of {"title", "id"} notes to resolve links against
    #[arg(long, value_name = "FILE")]
    notes: Option<String>,

    /// Prefix for note link targets
    #[arg(long, default_value = "note://")]
    prefix: String,

    /// Suffix for note link targets
    #[arg(long, default_value = "")]
    suffix: String,

    /// Drop raw HTML blocks
    #[arg(long)]
    no_html: bool,

    /// Document title (doc and bookmarks formats)
    #[arg(long)]
    title: Option<String>,

    /// Print line, word and link counts as JSON to stderr
    #[arg(long)]
    counts: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Doc,
    Markdown,
    Bookmarks,
}

#[derive(Clone, Copy, ValueEnum)]
enum IdFormat {
    Common,
    FileName,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> mkdown::Result<()> {
    let doc = match cli.input.as_deref() {
        Some(path) if path != "-" => Mkdown::from_path(path)?,
        _ => Mkdown::from_reader(io::stdin().lock())?,
    };
    let notes = cli.notes.as_deref().map(NoteIndex::from_path).transpose()?;
    if let Some(notes) = &notes {
        log::debug!("loaded {} notes", notes.len());
    }

    let options = options(cli);
    let rendered = doc.render(&options, notes.as_ref().map(|n| n as &dyn mkdown::LinkResolver));

    io::stdout().write_all(rendered.output.as_bytes())?;
    if cli.counts {
        let counts = serde_json::to_string(&rendered.counts)?;
        eprintln!("{counts}");
    }
    Ok(())
}

fn options(cli: &Cli) -> Options {
    Options {
        format: match cli.format {
            Format::Html => OutputFormat::HtmlFragment,
            Format::Doc => OutputFormat::HtmlDoc,
            Format::Markdown => OutputFormat::Markdown,
            Format::Bookmarks => OutputFormat::BookmarksXml,
        },
        wiki_link_format: match cli.wiki_format {
            IdFormat::Common => WikiLinkFormat::Common,
            IdFormat::FileName => WikiLinkFormat::FileName,
        },
        double_bracket_parsing: !cli.no_double_brackets,
        wiki_link_prefix: cli.prefix.clone(),
        wiki_link_suffix: cli.suffix.clone(),
        allow_html: !cli.no_html,
        title: cli.title.clone(),
    }
}
