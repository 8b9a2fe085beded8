use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use transmute_php::pipeline::DEFAULT_FUNCTION_CLASS;
use transmute_php::pipeline::DEFAULT_NAMESPACE;
use transmute_php::rewrite::Prefilter;
use transmute_php::rewrite::Rule;
use transmute_php::Options;

#[derive(Parser)]
#[command(
  name = "transmute-php",
  about = "Migrates legacy global PHP into a namespaced class API"
)]
struct Cli {
  /// Root directory of the legacy source tree.
  root: PathBuf,

  /// Persisted mapping document, rewritten in full each run.
  #[arg(short, long, default_value = "mappings.yaml")]
  mappings: PathBuf,

  /// Output directory for generated code.
  #[arg(short, long, default_value = "build")]
  out: PathBuf,

  /// Skip files whose path contains this substring. Repeatable.
  #[arg(short = 'x', long = "exclude", value_name = "SUBSTRING")]
  exclude: Vec<String>,

  /// Literal replacement applied before parsing. Repeatable.
  #[arg(long = "replace", value_name = "OLD=NEW", value_parser = parse_replace)]
  replace: Vec<(String, String)>,

  /// Comment out every match of this regex before parsing. Repeatable.
  #[arg(long = "comment-out", value_name = "REGEX")]
  comment_out: Vec<String>,

  /// Namespace assigned to newly discovered symbols.
  #[arg(long, default_value = DEFAULT_NAMESPACE)]
  namespace: String,

  /// Class that collects newly discovered functions.
  #[arg(long = "function-class", default_value = DEFAULT_FUNCTION_CLASS)]
  function_class: String,
}

fn parse_replace(value: &str) -> Result<(String, String), String> {
  match value.split_once('=') {
    Some((old, new)) if !old.is_empty() => Ok((old.to_owned(), new.to_owned())),
    _ => Err("expected OLD=NEW".to_owned()),
  }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_target(false)
    .init();

  let args = Cli::parse();
  let mut rules: Vec<Rule> = args
    .replace
    .into_iter()
    .map(|(old, new)| Rule::replace(old, new))
    .collect();
  for pattern in &args.comment_out {
    match Rule::comment_out(pattern) {
      Ok(rule) => rules.push(rule),
      Err(err) => {
        eprintln!("invalid --comment-out pattern `{}`: {}", pattern, err);
        process::exit(2);
      }
    }
  }

  let options = Options::new(args.root, args.mappings)
    .with_out_dir(args.out)
    .with_excludes(args.exclude)
    .with_defaults(args.namespace, args.function_class)
    .with_prefilter(Prefilter::new(rules));

  match transmute_php::run(&options) {
    Ok(report) => {
      println!(
        "{} files scanned, {} artifacts generated",
        report.scanned_files,
        report.generated.len()
      );
      println!(
        "{} live functions, {} live classes, {} outdated functions, {} outdated classes",
        report.live_functions,
        report.live_classes,
        report.outdated_functions,
        report.outdated_classes
      );
      if !report.parse_failures.is_empty() {
        println!("{} files failed to parse:", report.parse_failures.len());
        for failure in &report.parse_failures {
          println!("  {}: {}", failure.path.display(), failure.message);
        }
      }
    }
    Err(err) => {
      eprintln!("{}", err);
      process::exit(1);
    }
  }
}
