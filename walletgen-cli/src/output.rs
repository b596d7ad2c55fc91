//! Writing generated wallets as text, CSV or JSON

use std::fs::File;
use std::io::{self, BufWriter, Write};

use tracing::info;
use walletgen::AddressFormat;

use crate::batch::{GeneratedWallet, SkippedWallet};
use crate::config::{GeneratorConfig, OutputFormat};
use crate::error::CliError;

/// CSV column titles, address columns in `AddressFormat::ALL` order
pub const CSV_HEADER: [&str; 6] = [
    "#",
    "Legacy, BIP-44 P2PKH Address",
    "Nested Segwit, BIP-49 P2WPKH-in-P2SH Address",
    "Native Segwit, BIP-84 P2WPKH Address",
    "Taproot, BIP-86 P2TR Address",
    "Mnemonic",
];

/// Write `wallets` to the configured file, or to stdout
pub fn emit(config: &GeneratorConfig, wallets: &[GeneratedWallet]) -> Result<(), CliError> {
    let format = config.output_format();

    match &config.out {
        Some(path) => {
            let file = File::create(path)?;
            write(format, BufWriter::new(file), wallets)?;

            info!(path = %path.display(), wallets = wallets.len(), "output written");
            println!("Saved to: {}", path.display());
        }
        None => write(format, io::stdout().lock(), wallets)?,
    }
    Ok(())
}

pub fn write<W: Write>(format: OutputFormat, writer: W, wallets: &[GeneratedWallet]) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => write_text(writer, wallets),
        OutputFormat::Csv => write_csv(writer, wallets),
        OutputFormat::Json => write_json(writer, wallets),
    }
}

/// Labelled lines per wallet, blank line between wallets
pub fn write_text<W: Write>(mut writer: W, wallets: &[GeneratedWallet]) -> Result<(), CliError> {
    for (position, wallet) in wallets.iter().enumerate() {
        if position > 0 {
            writeln!(writer)?;
        }
        writeln!(writer, "Mnemonic: {}", wallet.mnemonic)?;
        for format in AddressFormat::ALL {
            writeln!(writer, "{} Address: {}", format.label(), wallet.addresses.get(format))?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv<W: Write>(writer: W, wallets: &[GeneratedWallet]) -> Result<(), CliError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    for wallet in wallets {
        let index = wallet.index.to_string();
        let mut row = vec![index.as_str()];
        row.extend(wallet.addresses.iter().map(|address| address.as_str()));
        row.push(wallet.mnemonic.as_str());
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut writer: W, wallets: &[GeneratedWallet]) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut writer, wallets)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Print skipped wallets on stderr so they never mix with the output
pub fn report_skipped(skipped: &[SkippedWallet]) {
    for wallet in skipped {
        eprintln!("Skipped wallet #{}: {}", wallet.index, wallet.error);
    }
}
