use fitscodec::hdu::{FitsData, Hdu, HduInfo};
use fitscodec::header::Card;
use fitscodec::value::Value;
use std::process;

fn card_string_value(cards: &[Card], keyword: &str) -> Option<String> {
    cards.iter().find_map(|c| {
        if c.keyword_str() == keyword {
            match &c.value {
                Some(Value::String(s)) => Some(s.trim().to_string()),
                _ => None,
            }
        } else {
            None
        }
    })
}

fn format_hdu(index: usize, hdu: &Hdu) -> String {
    let mut out = String::new();
    match &hdu.info {
        HduInfo::Primary { bitpix, naxes } => {
            out.push_str(&format!("HDU {}: Primary\n", index));
            out.push_str(&format!("  BITPIX: {}\n", bitpix));
            out.push_str(&format!("  NAXIS: {}\n", naxes.len()));
            if !naxes.is_empty() {
                out.push_str(&format!("  Dimensions: {:?}\n", naxes));
            }
            out.push_str(&format!("  Data size: {} bytes\n", hdu.data_len));
        }
        HduInfo::Image { bitpix, naxes } => {
            let extname = card_string_value(&hdu.cards, "EXTNAME");
            let ext_label = match extname {
                Some(name) => format!(" (EXTNAME: {})", name),
                None => String::new(),
            };
            out.push_str(&format!("HDU {}: IMAGE extension{}\n", index, ext_label));
            out.push_str(&format!("  BITPIX: {}\n", bitpix));
            out.push_str(&format!("  NAXIS: {}\n", naxes.len()));
            if !naxes.is_empty() {
                out.push_str(&format!("  Dimensions: {:?}\n", naxes));
            }
            out.push_str(&format!("  Data size: {} bytes\n", hdu.data_len));
        }
        HduInfo::AsciiTable {
            naxis1,
            naxis2,
            tfields,
        } => {
            let extname = card_string_value(&hdu.cards, "EXTNAME");
            let ext_label = match extname {
                Some(name) => format!(" (EXTNAME: {})", name),
                None => String::new(),
            };
            out.push_str(&format!("HDU {}: TABLE extension{}\n", index, ext_label));
            out.push_str(&format!("  Columns: {}\n", tfields));
            out.push_str(&format!("  Rows: {}\n", naxis2));
            out.push_str(&format!("  Row width: {} bytes\n", naxis1));
            out.push_str(&format!("  Data size: {} bytes\n", hdu.data_len));
        }
        HduInfo::BinaryTable {
            naxis1,
            naxis2,
            pcount,
            tfields,
        } => {
            let extname = card_string_value(&hdu.cards, "EXTNAME");
            let ext_label = match extname {
                Some(name) => format!(" (EXTNAME: {})", name),
                None => String::new(),
            };
            out.push_str(&format!("HDU {}: BINTABLE extension{}\n", index, ext_label));
            out.push_str(&format!("  Columns: {}\n", tfields));
            out.push_str(&format!("  Rows: {}\n", naxis2));
            out.push_str(&format!("  Row width: {} bytes\n", naxis1));
            out.push_str(&format!("  Data size: {} bytes\n", naxis1 * naxis2));
            if *pcount > 0 {
                out.push_str(&format!("  Heap size: {} bytes\n", pcount));
            }
        }
    }
    out
}

fn format_verbose_cards(cards: &[Card]) -> String {
    let mut out = String::new();
    out.push_str("  Header cards:\n");
    for card in cards {
        if card.is_end() {
            continue;
        }
        let kw = card.keyword_str();
        match (&card.value, &card.comment) {
            (Some(val), Some(comment)) => {
                out.push_str(&format!("    {} = {:?} / {}\n", kw, val, comment));
            }
            (Some(val), None) => {
                out.push_str(&format!("    {} = {:?}\n", kw, val));
            }
            (None, Some(comment)) => {
                out.push_str(&format!("    {} {}\n", kw, comment));
            }
            (None, None) => {
                if !card.is_blank() {
                    out.push_str(&format!("    {}\n", kw));
                }
            }
        }
    }
    out
}

fn format_fits_info(fits: &FitsData, verbose: bool) -> String {
    let mut out = String::new();
    for (i, hdu) in fits.hdus.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format_hdu(i, hdu));
        if verbose {
            out.push_str(&format_verbose_cards(&hdu.cards));
        }
    }
    out
}

fn run(args: &[String]) -> Result<String, String> {
    let mut verbose = false;
    let mut file_path = None;

    for arg in args {
        if arg == "-v" || arg == "--verbose" {
            verbose = true;
        } else if arg.starts_with('-') {
            return Err(format!("Unknown option: {}", arg));
        } else {
            if file_path.is_some() {
                return Err("Too many arguments".to_string());
            }
            file_path = Some(arg.as_str());
        }
    }

    let path = file_path.ok_or_else(|| {
        "Usage: fitsinfo [-v] <file.fits>\n\nPrint HDU summary for a FITS file.".to_string()
    })?;

    let data = std::fs::read(path).map_err(|e| format!("Error reading '{}': {}", path, e))?;

    let fits = fitscodec::hdu::parse_fits(&data)
        .map_err(|e| format!("Error parsing '{}': {}", path, e))?;

    Ok(format_fits_info(&fits, verbose))
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(output) => print!("{}", output),
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(1);
        }
    }
}
