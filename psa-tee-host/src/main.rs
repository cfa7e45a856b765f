mod runner;

use std::fs;
use std::str::FromStr;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use serde_derive::Deserialize;

use psa_tee::Algorithm;
use tee_crypto_rust_crypto::RustCryptoBackend;

use runner::{from_hex, to_hex, Runner, Settings};

#[derive(Debug, Deserialize)]
struct Config {
    chunk_size: Option<usize>,
    key_bits: Option<u32>,
    iv: Option<String>,
}

fn read_config(file_path: &str) -> Option<Config> {
    match fs::read(file_path) {
        Ok(bytes) => match toml::from_str::<Config>(&String::from_utf8_lossy(bytes.as_slice())) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to parse {}, {}", file_path, e);
                None
            }
        },
        Err(e) => {
            log::warn!("Failed to read {}, {}", file_path, e);
            None
        }
    }
}

fn settings(matches: &ArgMatches) -> Settings {
    let mut settings = Settings::default();
    if let Some(config) = matches.value_of("config").and_then(read_config) {
        if let Some(chunk_size) = config.chunk_size {
            settings.chunk_size = chunk_size;
        }
        if let Some(key_bits) = config.key_bits {
            settings.key_bits = key_bits;
        }
        if let Some(iv) = config.iv {
            match from_hex(&iv) {
                Some(iv) => settings.iv = iv,
                None => log::warn!("Ignoring invalid IV \"{}\"", iv),
            }
        }
    }
    settings
}

fn exit_with(message: String) -> ! {
    eprintln!("{}", message);
    ::std::process::exit(1);
}

fn algorithm(matches: &ArgMatches) -> Algorithm {
    let name = matches.value_of("algorithm").unwrap_or_default();
    match Algorithm::from_str(name) {
        Ok(algorithm) => algorithm,
        Err(e) => exit_with(format!("Invalid algorithm \"{}\", {}", name, e)),
    }
}

fn read_input(matches: &ArgMatches) -> Vec<u8> {
    let file_path = matches.value_of("file").unwrap_or_default();
    match fs::read(file_path) {
        Ok(data) => data,
        Err(e) => exit_with(format!("Failed to read \"{}\". Error: {}", file_path, e)),
    }
}

fn algorithm_arg() -> Arg<'static, 'static> {
    Arg::with_name("algorithm")
        .help("Algorithm name, such as sha256, ctr or hmac-sha256")
        .required(true)
}

fn file_arg() -> Arg<'static, 'static> {
    Arg::with_name("file")
        .help("Path to the input file")
        .required(true)
}

fn main() {
    env_logger::init();
    let matches = App::new("PSA crypto over a software TEE engine")
        .about("Run PSA crypto operations through the TEE adapter")
        .setting(AppSettings::DisableVersion)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .help("Path to configuration file")
                .use_delimiter(false)
                .required(false)
                .takes_value(true),
        )
        .subcommand(
            SubCommand::with_name("hash")
                .about("Digest a file")
                .arg(algorithm_arg())
                .arg(file_arg()),
        )
        .subcommand(
            SubCommand::with_name("encrypt")
                .about("Encrypt and decrypt a file with a generated key")
                .arg(algorithm_arg())
                .arg(file_arg()),
        )
        .subcommand(
            SubCommand::with_name("mac")
                .about("Compute the MAC of a file with a generated key")
                .arg(algorithm_arg())
                .arg(file_arg()),
        )
        .subcommand(
            SubCommand::with_name("keygen")
                .about("Generate a key")
                .arg(algorithm_arg())
                .arg(
                    Arg::with_name("bits")
                        .help("Requested key size in bits")
                        .required(false),
                ),
        )
        .subcommand(
            SubCommand::with_name("random")
                .about("Generate random octets")
                .arg(
                    Arg::with_name("size")
                        .help("Number of octets")
                        .required(true),
                ),
        )
        .get_matches();

    let mut runner = Runner::new(RustCryptoBackend::default(), settings(&matches));

    let result = match matches.subcommand() {
        ("hash", Some(sub)) => {
            let data = read_input(sub);
            runner
                .hash(algorithm(sub), &data)
                .map(|hash| println!("{}", to_hex(&hash)))
        }
        ("encrypt", Some(sub)) => {
            let data = read_input(sub);
            runner.encrypt(algorithm(sub), &data).map(|encrypted| {
                println!("{}", to_hex(&encrypted.cipher_text));
                println!(
                    "Round trip {}",
                    if encrypted.round_trip { "ok" } else { "FAILED" }
                );
            })
        }
        ("mac", Some(sub)) => {
            let data = read_input(sub);
            runner
                .mac(algorithm(sub), &data)
                .map(|mac| println!("{}", to_hex(&mac)))
        }
        ("keygen", Some(sub)) => {
            let bits = match sub.value_of("bits").map(u32::from_str) {
                None => 0,
                Some(Ok(bits)) => bits,
                Some(Err(e)) => exit_with(format!("Invalid key size, {}", e)),
            };
            runner.keygen(algorithm(sub), bits).map(|outcome| {
                if let Some(bits) = outcome.bits() {
                    if outcome.is_corrected() {
                        println!(
                            "{} bits, corrected from {}",
                            bits,
                            sub.value_of("bits").unwrap_or("0")
                        );
                    } else {
                        println!("{} bits", bits);
                    }
                }
            })
        }
        ("random", Some(sub)) => {
            let size = match sub.value_of("size").map(usize::from_str) {
                Some(Ok(size)) => size,
                _ => exit_with("Invalid size".to_string()),
            };
            runner
                .random(size)
                .map(|buffer| println!("{}", to_hex(&buffer)))
        }
        _ => Ok(()),
    };

    if let Err(e) = result {
        exit_with(format!("Failed, {} (status {})", e, e.status()));
    }
}
