use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::exit;
use std::str::FromStr;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::info;
use maskgen::consts::*;
use maskgen::{generate, ClaimSet, Error, Params};

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Format {
    // verifier text
    Mv,
    // bincode encoding of the structured document
    Bin,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "mv" => Ok(Format::Mv),
            "bin" => Ok(Format::Bin),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

fn app() -> Command {
    Command::new("maskgen")
        .about("Generates masked Picnic / KKW gadgets for probing-security verification")
        .arg(
            Arg::new("parties")
                .short('N')
                .long("parties")
                .help("Number of MPC parties (at least 3)")
                .default_value("4")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("nbits")
                .short('n')
                .long("nbits")
                .help("LowMC block size in bits, a multiple of 3 (PICNIC only)")
                .default_value("9")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("rounds")
                .short('r')
                .long("rounds")
                .help("Number of LowMC rounds (PICNIC only)")
                .default_value("2")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("masking")
                .short('d')
                .long("masking")
                .help("Masking order: every sensitive value is split into d + 1 shares")
                .default_value("1")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("type")
                .short('t')
                .long("type")
                .help("Protocol variant: \"PICNIC\" or \"KKW\"")
                .default_value("PICNIC"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Path of the generated file (default: derived from the parameters)")
                .conflicts_with("stdout")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("stdout")
                .long("stdout")
                .help("Write the generated document to standard output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format: \"mv\" (verifier text) or \"bin\" (bincode)")
                .default_value("mv"),
        )
        .arg(
            Arg::new("claims")
                .long("claims")
                .help("Claimed procedures: \"top-level\" or \"extended\"")
                .default_value("top-level"),
        )
        .arg(
            Arg::new("digest")
                .long("digest")
                .help("Print the blake3 digest of the rendered document")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version-info")
                .long("version-info")
                .help("Print version and build information")
                .action(ArgAction::SetTrue),
        )
}

fn params(matches: &ArgMatches) -> Result<Params, Error> {
    let get = |id: &str, default: usize| matches.get_one::<usize>(id).copied().unwrap_or(default);
    let variant = matches
        .get_one::<String>("type")
        .map(String::as_str)
        .unwrap_or("PICNIC");
    Params::new(
        get("parties", DEFAULT_PARTIES),
        get("nbits", DEFAULT_NBITS),
        get("rounds", DEFAULT_ROUNDS),
        get("masking", DEFAULT_MASKING),
        variant,
    )
}

fn parse_option<T: FromStr<Err = Error> + Default>(matches: &ArgMatches, id: &str) -> Result<T, Error> {
    match matches.get_one::<String>(id) {
        Some(value) => value.parse(),
        None => Ok(T::default()),
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::Mv
    }
}

fn run(matches: &ArgMatches) -> io::Result<Result<(), Error>> {
    let (params, format, claims) = match (
        params(matches),
        parse_option::<Format>(matches, "format"),
        parse_option::<ClaimSet>(matches, "claims"),
    ) {
        (Ok(params), Ok(format), Ok(claims)) => (params, format, claims),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => return Ok(Err(e)),
    };

    let document = match generate(&params, claims) {
        Ok(document) => document,
        Err(e) => return Ok(Err(e)),
    };
    let digest = document.digest();
    info!("digest: {}", digest.to_hex());

    let bytes = match format {
        Format::Mv => document.render().into_bytes(),
        Format::Bin => document
            .serialize()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?,
    };

    let to_stdout = matches.get_flag("stdout");
    if to_stdout {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        writer.write_all(&bytes)?;
        writer.flush()?;
    } else {
        let path = match matches.get_one::<PathBuf>("output") {
            Some(path) => path.clone(),
            None => match format {
                Format::Mv => PathBuf::from(params.file_name()),
                Format::Bin => PathBuf::from(params.file_name()).with_extension("bin"),
            },
        };
        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(&bytes)?;
        writer.flush()?;
        info!("wrote {} bytes to {}", bytes.len(), path.display());
    }

    if matches.get_flag("digest") {
        // keep standard output clean when it carries the document
        if to_stdout {
            eprintln!("{}", digest.to_hex());
        } else {
            println!("{}", digest.to_hex());
        }
    }
    Ok(Ok(()))
}

fn print_version() {
    println!("maskgen_version: maskgen {}", built_info::PKG_VERSION);
    if let (Some(dirty), Some(hash)) = (built_info::GIT_DIRTY, built_info::GIT_COMMIT_HASH) {
        println!("maskgen_commit_sha: {}", hash);
        println!(
            "maskgen_uncommitted_changes: {}",
            if dirty { "TRUE" } else { "FALSE" }
        );
    }
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = app().get_matches();
    if matches.get_flag("version-info") {
        print_version();
        return;
    }

    match run(&matches) {
        Err(e) => {
            eprintln!("Could not write output: {}", e);
            exit(-1)
        }
        Ok(Err(e)) => {
            eprintln!("Invalid parameters: {}", e);
            exit(-1)
        }
        Ok(Ok(())) => (),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    use maskgen::Variant;

    #[test]
    fn test_app() {
        app().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let matches = app().get_matches_from(["maskgen"]);
        assert_eq!(params(&matches), Ok(Params::default()));
        assert_eq!(parse_option::<Format>(&matches, "format"), Ok(Format::Mv));
        assert_eq!(
            parse_option::<ClaimSet>(&matches, "claims"),
            Ok(ClaimSet::TopLevel)
        );
    }

    #[test]
    fn test_params() {
        let matches = app().get_matches_from(["maskgen", "-N", "3", "-d", "2", "-t", "KKW"]);
        let params = params(&matches).unwrap();
        assert_eq!(params.parties, 3);
        assert_eq!(params.masking, 2);
        assert_eq!(params.variant, Variant::Kkw);
    }

    #[test]
    fn test_rejects() {
        let matches = app().get_matches_from(["maskgen", "-N", "4", "-t", "RSA"]);
        assert_eq!(
            params(&matches),
            Err(Error::UnsupportedVariant("RSA".to_string()))
        );

        let matches = app().get_matches_from(["maskgen", "--format", "json"]);
        assert_eq!(
            parse_option::<Format>(&matches, "format"),
            Err(Error::UnsupportedFormat("json".to_string()))
        );

        // a stdout run has no file to write
        assert!(app()
            .try_get_matches_from(["maskgen", "--stdout", "-o", "out.mv"])
            .is_err());
    }
}
