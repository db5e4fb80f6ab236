//! Writes and reads `Person` fixtures

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use quack_wire::person::{Age, Name, Person};
use quack_wire::{BytesReader, DecoderConfig, Payload, Reader, Writer};
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;

type CliResult = Result<(), Box<dyn Error>>;

fn encode(m: &ArgMatches) -> CliResult {
    let output = m.value_of("OUTPUT").ok_or("missing output")?;
    let person = Person {
        name: m.value_of("name").map(|v| Name {
            value: v.to_string(),
        }),
        age: match m.value_of("age") {
            Some(v) => Some(Age { value: v.parse()? }),
            None => None,
        },
    };
    let mut writer = Writer::new(BufWriter::new(File::create(output)?));
    writer.write_message_without_len(&person)?;
    writer.into_inner().flush()?;
    info!("wrote {:?} to {}", person, output);
    Ok(())
}

fn decode(m: &ArgMatches) -> CliResult {
    let input = m.value_of("INPUT").ok_or("missing input")?;
    let mut config = DecoderConfig::default();
    if let Some(depth) = m.value_of("max-depth") {
        config = config.with_max_depth(depth.parse()?);
    }
    let reader = Reader::from_file(input)?.with_config(config);
    let person: Person = reader.read()?;
    println!("{:#?}", person);
    Ok(())
}

fn inspect(m: &ArgMatches) -> CliResult {
    let input = m.value_of("INPUT").ok_or("missing input")?;
    let reader = Reader::from_file(input)?;
    let mut r = BytesReader::from_bytes(reader.buffer());
    while !r.is_eof() {
        let offset = r.position();
        let field = r.read_field()?;
        let value = match field.payload {
            Payload::Varint(v) => v.to_string(),
            Payload::Fixed64(b) => hex(&b),
            Payload::Fixed32(b) => hex(&b),
            Payload::LengthDelimited(b) => hex(b),
        };
        println!(
            "@{:<6} tag: {:<4} wire: {:<22} value: {}",
            offset,
            field.key.tag,
            field.key.wire_type.to_string(),
            value
        );
    }
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() {
    env_logger::init();

    let matches = App::new("quack-dump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Writes and reads protobuf encoded Person messages")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("encode")
                .about("Writes a Person fixture")
                .arg(Arg::with_name("OUTPUT").required(true).help("File to write"))
                .arg(
                    Arg::with_name("name")
                        .long("name")
                        .takes_value(true)
                        .default_value("Alice"),
                )
                .arg(
                    Arg::with_name("age")
                        .long("age")
                        .takes_value(true)
                        .default_value("20"),
                ),
        )
        .subcommand(
            SubCommand::with_name("decode")
                .about("Decodes a Person and prints it")
                .arg(Arg::with_name("INPUT").required(true).help("File to read"))
                .arg(
                    Arg::with_name("max-depth")
                        .long("max-depth")
                        .takes_value(true)
                        .help("Deepest allowed embedded message"),
                ),
        )
        .subcommand(
            SubCommand::with_name("inspect")
                .about("Prints the top-level fields without a schema")
                .arg(Arg::with_name("INPUT").required(true).help("File to read")),
        )
        .get_matches();

    let res = match matches.subcommand() {
        ("encode", Some(m)) => encode(m),
        ("decode", Some(m)) => decode(m),
        ("inspect", Some(m)) => inspect(m),
        _ => unreachable!("a subcommand is required"),
    };

    if let Err(e) = res {
        eprintln!("quack-dump: {}", e);
        process::exit(1);
    }
}
