use byteorder::{ByteOrder, LittleEndian};
use clap::{Arg, ArgAction, ArgMatches, Command};
use hccontrol::hcioctl::{device_path, FIRST_DEVICE_INDEX};
use hccontrol::{ChipSelect, HcControl, SimulatedBoard, Transport, MAX_DATA_LENGTH};
use log::debug;

use std::error::Error;
use std::fs;
use std::process;
use std::str::FromStr;

enum Formats {
    Decimal,
    Hex,
    Binary,
}

impl FromStr for Formats {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "d" => Ok(Formats::Decimal),
            "h" => Ok(Formats::Hex),
            "b" => Ok(Formats::Binary),
            _ => Err("no match"),
        }
    }
}

fn parse_number(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        (bin, 2)
    } else {
        (s, 10)
    };
    u64::from_str_radix(&digits.replace('_', ""), radix)
        .map_err(|err| format!("invalid number {}: {}", s, err))
}

fn parse_u16(s: &str) -> Result<u16, String> {
    u16::try_from(parse_number(s)?).map_err(|_| format!("{} does not fit in 16 bits", s))
}

fn parse_u32(s: &str) -> Result<u32, String> {
    u32::try_from(parse_number(s)?).map_err(|_| format!("{} does not fit in 32 bits", s))
}

fn parse_chip_select(s: &str) -> Result<ChipSelect, String> {
    ChipSelect::new(parse_u16(s)?).map_err(|err| err.to_string())
}

fn chips_arg() -> Arg {
    Arg::new("chips")
        .short('c')
        .long("chips")
        .required(true)
        .value_parser(parse_chip_select)
        .help("chip select mask, FPGA0 is the LSB (e.g. 0x1, 0b101, 3)")
}

fn address_arg() -> Arg {
    Arg::new("address")
        .short('a')
        .long("address")
        .required(true)
        .value_parser(parse_u16)
        .help("register or start address")
}

fn cli() -> Command {
    Command::new("hctest")
        .version("0.1")
        .about("HC62 FPGA board test tool")
        .subcommand_required(true)
        .arg(
            Arg::new("device")
                .short('d')
                .long("device")
                .help("The driver device path, if empty /dev/hc62_1 is used"),
        )
        .arg(
            Arg::new("simulate")
                .long("simulate")
                .action(ArgAction::SetTrue)
                .help("Runs the command against an in-memory board"),
        )
        .subcommand(
            Command::new("init")
                .about("Puts chips into programming mode")
                .arg(chips_arg()),
        )
        .subcommand(
            Command::new("end")
                .about("Ends programming of chips")
                .arg(chips_arg()),
        )
        .subcommand(
            Command::new("select")
                .about("Selects the active chips")
                .arg(chips_arg()),
        )
        .subcommand(
            Command::new("program")
                .about("Loads a bitstream file into chips")
                .arg(chips_arg())
                .arg(
                    Arg::new("file-path")
                        .short('f')
                        .required(true)
                        .help("the bitstream file path"),
                ),
        )
        .subcommand(
            Command::new("write")
                .about("Writes a register")
                .arg(chips_arg())
                .arg(address_arg())
                .arg(
                    Arg::new("value")
                        .short('v')
                        .required(true)
                        .value_parser(parse_u32)
                        .help("the register value"),
                ),
        )
        .subcommand(
            Command::new("read")
                .about("Reads a register of one chip")
                .arg(chips_arg())
                .arg(address_arg())
                .arg(
                    Arg::new("format")
                        .short('f')
                        .default_value("d")
                        .value_parser(["d", "h", "b"])
                        .help("the value format"),
                ),
        )
        .subcommand(
            Command::new("block-write")
                .about("Writes a file of little-endian words")
                .arg(chips_arg())
                .arg(address_arg())
                .arg(
                    Arg::new("file-path")
                        .short('f')
                        .required(true)
                        .help("the data file path"),
                ),
        )
        .subcommand(
            Command::new("block-read")
                .about("Reads a block of words from one chip")
                .arg(chips_arg())
                .arg(address_arg())
                .arg(
                    Arg::new("count")
                        .short('n')
                        .required(true)
                        .value_parser(clap::value_parser!(usize))
                        .help("number of 32-bit words"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .help("writes the words to this file instead of printing them"),
                ),
        )
}

fn main() {
    env_logger::init();
    let matches = cli().get_matches();
    debug!("parsed cli command with {:?}", matches);

    let result = if matches.get_flag("simulate") {
        let mut hc = HcControl::with_transport(SimulatedBoard::new());
        run(&mut hc, &matches)
    } else {
        let path = matches
            .get_one::<String>("device")
            .cloned()
            .unwrap_or_else(|| device_path(FIRST_DEVICE_INDEX));
        // closes the driver when it goes out of scope
        let mut hc = HcControl::new_at(&path);
        if let Err(err) = hc.open() {
            println!("open file error: {}", err);
            process::exit(1);
        }
        run(&mut hc, &matches)
    };

    if let Err(err) = result {
        println!("error: {}", err);
        process::exit(1);
    }
}

fn chips(matches: &ArgMatches) -> ChipSelect {
    matches
        .get_one::<ChipSelect>("chips")
        .copied()
        .unwrap_or_default()
}

fn address(matches: &ArgMatches) -> u16 {
    matches.get_one::<u16>("address").copied().unwrap_or(0)
}

fn file_path(matches: &ArgMatches) -> Result<&String, Box<dyn Error>> {
    matches
        .get_one::<String>("file-path")
        .ok_or_else(|| From::from("no file path specified"))
}

fn run<T: Transport>(hc: &mut HcControl<T>, matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    match matches.subcommand() {
        Some(("init", m)) => hc.program_init(chips(m))?,
        Some(("end", m)) => hc.program_end(chips(m))?,
        Some(("select", m)) => {
            hc.chip_select(chips(m))?;
            println!("selected chips {}", chips(m));
        }
        Some(("program", m)) => {
            let data = fs::read(file_path(m)?)?;
            program_bitstream(hc, chips(m), &data)?;
        }
        Some(("write", m)) => {
            let value = m.get_one::<u32>("value").copied().unwrap_or(0);
            hc.write(chips(m), address(m), value)?;
            println!(
                "written value {} dec (={:#x} hex) to address {}.",
                value,
                value,
                address(m)
            );
        }
        Some(("read", m)) => {
            let format = m
                .get_one::<String>("format")
                .map(|f| f.parse::<Formats>())
                .unwrap_or(Ok(Formats::Decimal))?;
            read_register(hc, chips(m), address(m), format)?;
        }
        Some(("block-write", m)) => {
            let bytes = fs::read(file_path(m)?)?;
            if bytes.len() % 4 != 0 {
                return Err(From::from(format!(
                    "file length {} is not a whole number of words",
                    bytes.len()
                )));
            }
            let mut words = vec![0u32; bytes.len() / 4];
            LittleEndian::read_u32_into(&bytes, &mut words);
            hc.block_write(chips(m), address(m), &words)?;
            println!("written {} words from address {}.", words.len(), address(m));
        }
        Some(("block-read", m)) => {
            let count = m.get_one::<usize>("count").copied().unwrap_or(0);
            let words = hc.block_read(chips(m), address(m), count)?;
            match m.get_one::<String>("output") {
                Some(fp) => {
                    let mut bytes = vec![0u8; words.len() * 4];
                    LittleEndian::write_u32_into(&words, &mut bytes);
                    fs::write(fp, bytes)?;
                }
                None => show_words(address(m), &words),
            }
        }
        _ => println!("no command specified"),
    }
    Ok(())
}

/// Brackets the bitstream with init and end, in program-buffer sized pieces.
fn program_bitstream<T: Transport>(
    hc: &mut HcControl<T>,
    cs: ChipSelect,
    data: &[u8],
) -> Result<(), Box<dyn Error>> {
    hc.program_init(cs)?;
    for chunk in data.chunks(MAX_DATA_LENGTH) {
        hc.program(cs, chunk)?;
    }
    hc.program_end(cs)?;
    println!("programmed {} bytes into chips {}", data.len(), cs);
    Ok(())
}

fn read_register<T: Transport>(
    hc: &mut HcControl<T>,
    cs: ChipSelect,
    address: u16,
    format: Formats,
) -> Result<(), Box<dyn Error>> {
    let value = hc.read(cs, address)?;
    match format {
        Formats::Hex => println!("register {}: {:#010x}", address, value),
        Formats::Binary => println!("register {}: {:#034b}", address, value),
        Formats::Decimal => println!("register {}: {} dec (={:#x} hex)", address, value, value),
    }
    Ok(())
}

fn show_words(start: u16, words: &[u32]) {
    for (row, chunk) in words.chunks(4).enumerate() {
        let line: Vec<String> = chunk.iter().map(|w| format!("{:08x}", w)).collect();
        println!(
            "{:04x}: {}",
            start.wrapping_add((row * 4) as u16),
            line.join(" ")
        );
    }
}
