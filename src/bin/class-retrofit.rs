use std::{io, path::PathBuf, process};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use class_retrofit::{ClassVersion, InvalidClassPolicy, Retrofitter, VersionPatcher};
use log::{error, LevelFilter};
use log4rs::{
  append::console::{ConsoleAppender, Target},
  config::{Appender, Root},
  Config,
};

fn main() {
  let matches = get_matches();
  configure_logging(matches.get_flag("verbose"));

  let target_major = match matches.get_one::<u16>("target-major") {
    Some(major) => *major,
    None => matches
      .get_one::<ClassVersion>("target-release")
      .copied()
      .unwrap_or(ClassVersion::DEFAULT_TARGET)
      .major,
  };
  let policy = if matches.get_flag("skip-invalid") {
    InvalidClassPolicy::Skip
  } else {
    InvalidClassPolicy::Abort
  };
  let retrofitter = Retrofitter::new(VersionPatcher::new(target_major)).invalid_class_policy(policy);

  // "src" is required, so clap has already rejected a missing one.
  let Some(src) = matches.get_one::<PathBuf>("src") else {
    process::exit(2);
  };
  let dst = matches.get_one::<PathBuf>("dst");

  match retrofitter.retrofit(src, dst.map(PathBuf::as_path)) {
    Ok(summary) => {
      println!(
        "{} rewritten, {} copied unchanged, {} up to date, {} invalid skipped",
        summary.rewritten, summary.copied_unchanged, summary.up_to_date, summary.invalid_skipped
      );
    }
    Err(e) => {
      error!("retrofit failed: {e}");
      eprintln!("class-retrofit: {e}");
      process::exit(1);
    }
  }
}

fn parse_release(s: &str) -> Result<ClassVersion, String> {
  ClassVersion::from_release(s).ok_or_else(|| {
    format!(
      "unknown Java release '{s}', expected 1.1 .. 1.8 or 5 .. {}",
      ClassVersion::LATEST.major - 44
    )
  })
}

fn get_matches() -> ArgMatches {
  Command::new("class-retrofit")
    .version(env!("CARGO_PKG_VERSION"))
    .about("Rewrites the major version of class files so that older JVMs load them")
    .arg(
      Arg::new("src")
        .help("Class file or directory to patch")
        .required(true)
        .value_parser(value_parser!(PathBuf)),
    )
    .arg(
      Arg::new("dst")
        .help("Destination file or directory. Patches SRC in place when omitted")
        .value_parser(value_parser!(PathBuf)),
    )
    .arg(
      Arg::new("target-release")
        .help("Java release to target, e.g. 1.5 or 8")
        .long("target-release")
        .short('r')
        .value_name("RELEASE")
        .value_parser(parse_release)
        .conflicts_with("target-major"),
    )
    .arg(
      Arg::new("target-major")
        .help("Raw class file major version to write, e.g. 49")
        .long("target-major")
        .short('m')
        .value_name("MAJOR")
        .value_parser(value_parser!(u16)),
    )
    .arg(
      Arg::new("skip-invalid")
        .help("Warn about and skip .class files that are not class files instead of stopping")
        .long("skip-invalid")
        .action(ArgAction::SetTrue),
    )
    .arg(
      Arg::new("verbose")
        .help("Log each patched file")
        .long("verbose")
        .short('v')
        .action(ArgAction::SetTrue),
    )
    .get_matches()
}

fn configure_logging(verbose: bool) {
  // initialize logging, preferably from config file
  let fallback_level = if verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Warn
  };
  if let Err(e) = log4rs::init_file(
    "logging-config.yaml",
    log4rs::config::Deserializers::default(),
  ) {
    match e.downcast_ref::<io::Error>() {
      // No config file in the working directory: log to stderr instead.
      Some(os_err) if os_err.kind() == io::ErrorKind::NotFound => {
        let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
        let conf = Config::builder()
          .appender(Appender::builder().build("stderr", Box::new(stderr)))
          .build(Root::builder().appender("stderr").build(fallback_level));
        match conf {
          Ok(conf) => {
            if let Err(e) = log4rs::init_config(conf) {
              eprintln!("Logging setup failed: {e}");
            }
          }
          Err(e) => eprintln!("Logging config problem: {e}"),
        }
      }
      _ => eprintln!("Config problem: {e:?}"),
    }
  }
}
