//! CLI inspector for population dataset documents.
//!
//! Examples:
//!   poprace-cli years data/population.json
//!   poprace-cli top data/population.json 1975
//!   poprace-cli top data/population.json 1975 --exclude Asia,Europe
//!
//! Accepts the same JSON document the daemon's store holds (a leading
//! `_id` field is ignored).

use std::fs;
use std::process;

use poprace::dataset::{Continent, YearlyDataset};
use poprace::format;
use poprace::frame::rank_year;
use poprace::playback::ContinentFilter;

fn usage() -> ! {
    eprintln!("usage: poprace-cli years <dataset.json>");
    eprintln!("       poprace-cli top <dataset.json> <year> [--exclude A,B,..]");
    process::exit(2);
}

fn load_dataset(path: &str) -> YearlyDataset {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: cannot read {path}: {e}");
            process::exit(1);
        }
    };
    let mut doc: serde_json::Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {path} is not valid JSON: {e}");
            process::exit(1);
        }
    };
    if let Some(obj) = doc.as_object_mut() {
        obj.remove("_id");
    }
    match serde_json::from_value(doc) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {path} is not a population document: {e}");
            process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        usage();
    }

    match args[0].as_str() {
        "years" => {
            let data = load_dataset(&args[1]);
            for year in data.year_keys() {
                println!("{year}  ({} records)", data.records(year).len());
            }
        }
        "top" => {
            if args.len() < 3 {
                usage();
            }
            let data = load_dataset(&args[1]);
            let year = args[2].as_str();
            if data.records(year).is_empty() {
                eprintln!("error: no records for year {year}");
                process::exit(1);
            }

            let mut filter = ContinentFilter::new();
            let mut rest = args[3..].iter();
            while let Some(a) = rest.next() {
                match a.as_str() {
                    "--exclude" => {
                        let Some(list) = rest.next() else { usage() };
                        for name in list.split(',') {
                            filter.toggle(Continent::from(name.to_string()));
                        }
                    }
                    _ => usage(),
                }
            }

            let ranked = rank_year(data.records(year), &filter);
            let total: u64 = ranked.iter().map(|r| r.population).sum();
            println!("{year}  top {} by population", ranked.len());
            for (i, r) in ranked.iter().enumerate() {
                println!(
                    "{:>3}  {:<30} {:>15}  {}",
                    i + 1,
                    r.name,
                    format::group_thousands(r.population),
                    r.continent.name()
                );
            }
            println!("     total: {}", format::group_thousands(total));
        }
        _ => usage(),
    }
}
