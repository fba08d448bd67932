//! Binary log inspection tool.
//!
//! Usage:
//!   pitchcap-reader packets_binary.log
//!   pitchcap-reader --stats packets_binary.log
//!   pitchcap-reader --details --messages -n 20 --type DATA packets_binary.log
//!   pitchcap-reader --seq-start 1000 --seq-end 2000 --port 30501 packets_binary.log

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use pitchcap_codec::InnerMessageIter;
use pitchcap_reader::display::format_timestamp;
use pitchcap_reader::{LogFileReader, LogStatistics, RecordFilter};
use pitchcap_types::{
    lookup_message_type, order_status_name, packet_type_name, BinaryLogRecord, PacketType,
};

#[derive(Parser, Debug)]
#[command(name = "pitchcap-reader")]
#[command(about = "Inspect and analyze pitchcap binary packet logs")]
#[command(version)]
struct Args {
    /// Binary log segment file
    file: PathBuf,

    /// Show statistics summary
    #[arg(short, long)]
    stats: bool,

    /// Show detailed packet information
    #[arg(short, long)]
    details: bool,

    /// Show message details within packets
    #[arg(short, long)]
    messages: bool,

    /// Limit output to N records
    #[arg(short = 'n', long = "max-records", value_name = "N")]
    max_records: Option<u64>,

    /// Filter sequences >= N
    #[arg(long = "seq-start", value_name = "N")]
    seq_start: Option<u32>,

    /// Filter sequences <= N
    #[arg(long = "seq-end", value_name = "N")]
    seq_end: Option<u32>,

    /// Filter by port number
    #[arg(long, value_name = "N")]
    port: Option<u16>,

    /// Filter by packet type (HEARTBEAT|ADMIN|UNSEQUENCED|DATA)
    #[arg(long = "type", value_name = "TYPE")]
    packet_type: Option<PacketType>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = RecordFilter {
        seq_start: args.seq_start,
        seq_end: args.seq_end,
        port: args.port,
        packet_type: args.packet_type,
    };

    let mut reader = LogFileReader::open(&args.file)?;
    println!("Reading binary log file: {}", args.file.display());
    println!("File size: {} bytes", reader.file_size());

    let mut stats = LogStatistics::new();
    let mut records_processed: u64 = 0;
    let mut records_shown: u64 = 0;

    while let Some((record, payload)) = reader.next_record()? {
        records_processed += 1;

        if filter.matches(&record) {
            stats.update(&record, &payload);

            if args.details && args.max_records.map_or(true, |max| records_shown < max) {
                records_shown += 1;
                print_record(records_shown, &record);
                if args.messages && !payload.is_empty() {
                    print_messages(&payload);
                }
            }
        }

        if records_processed % 10_000 == 0 {
            print!(
                "\rProgress: {:.1}% ({} records processed)",
                reader.progress(),
                records_processed
            );
            std::io::stdout().flush()?;
        }
    }

    println!("\rCompleted: 100.0% ({records_processed} records processed)");

    if args.stats {
        stats.print_summary();
    }

    if !args.details && !args.stats {
        println!("\nQuick Summary:");
        println!("Total records processed: {records_processed}");
        println!("Use -s for statistics, -d for details, -m for message parsing");
    }

    Ok(())
}

fn print_record(index: u64, record: &BinaryLogRecord) {
    println!("\n--- Record {index} ---");
    println!("Timestamp: {}", format_timestamp(record.timestamp_ns.get()));
    println!("Packet ID: {}", record.packet_id.get());
    println!("Sequence: {}", record.sequence.get());
    println!("Source IP: {}", record.src_addr());
    println!("Port: {}", record.port.get());
    println!("Length: {}", record.length.get());
    println!("Count: {}", record.count);
    println!("Unit: {}", record.unit);
    println!("Packet Type: {}", packet_type_name(record.packet_type));
    println!("Order Status: {}", order_status_name(record.order_status));
    println!("Payload Length: {}", record.payload_length.get());
}

fn print_messages(payload: &[u8]) {
    let mut shown = false;
    for (index, message) in InnerMessageIter::new(payload).enumerate() {
        if !shown {
            println!("Messages:");
            shown = true;
        }
        let name = lookup_message_type(message.header.message_type)
            .map_or("UNKNOWN", |info| info.name);
        println!(
            "  {}: Type=0x{:02x} ({}), Len={}",
            index + 1,
            message.header.message_type,
            name,
            message.header.length
        );
    }
}
