use anyhow::Result;
use flate2::read::MultiGzDecoder;
use grep_cli::stdout;
use gzp::{deflate::Gzip, Compression, ZBuilder};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use termcolor::ColorChoice;

use super::fs::is_bgzipped;

/// Open a plain or gzip-compressed text file for line-oriented reading.
pub fn open_text<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    if is_bgzipped(path) {
        Ok(Box::new(BufReader::with_capacity(
            256 * 1024,
            MultiGzDecoder::new(file),
        )))
    } else {
        Ok(Box::new(BufReader::with_capacity(256 * 1024, file)))
    }
}

/// Build a tab-delimited CSV writer targeting a file or stdout with optional gzip compression.
pub fn get_writer<P: AsRef<Path>>(
    path: &Option<P>,
    gzipped: bool,
    write_headers: bool,
    threads: usize,
    compression_level: u32,
) -> Result<csv::Writer<Box<dyn Write>>> {
    let raw_writer: Box<dyn Write> = match path {
        Some(path) if path.as_ref().as_os_str() != "-" => {
            let writer = BufWriter::new(File::create(path)?);
            if gzipped {
                Box::new(
                    ZBuilder::<Gzip, _>::new()
                        .num_threads(threads)
                        .compression_level(Compression::new(compression_level))
                        .from_writer(writer),
                )
            } else {
                Box::new(writer)
            }
        }
        _ => {
            let writer = stdout(ColorChoice::Never);
            if gzipped {
                Box::new(
                    ZBuilder::<Gzip, _>::new()
                        .num_threads(threads)
                        .compression_level(Compression::new(compression_level))
                        .from_writer(writer),
                )
            } else {
                Box::new(writer)
            }
        }
    };

    Ok(csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(write_headers)
        .from_writer(raw_writer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn reads_plain_and_gzipped_text() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("barcodes.tsv");
        std::fs::write(&plain, "AAAA-1\nCCCC-1\n").unwrap();

        let gz = dir.path().join("barcodes.tsv.gz");
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), flate2::Compression::fast());
        encoder.write_all(b"AAAA-1\nCCCC-1\n").unwrap();
        encoder.finish().unwrap();

        let plain_lines: Vec<String> = open_text(&plain).unwrap().lines().map(|l| l.unwrap()).collect();
        let gz_lines: Vec<String> = open_text(&gz).unwrap().lines().map(|l| l.unwrap()).collect();
        assert_eq!(plain_lines, vec!["AAAA-1", "CCCC-1"]);
        assert_eq!(plain_lines, gz_lines);
    }

    #[test]
    fn writes_tab_delimited_rows() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("loci.tsv");
        {
            let mut writer = get_writer(&Some(out.clone()), false, true, 1, 6).unwrap();
            writer.write_record(["index", "bases"]).unwrap();
            writer.write_record(["0", "60"]).unwrap();
            writer.flush().unwrap();
        }
        let mut contents = String::new();
        File::open(&out).unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "index\tbases\n0\t60\n");
    }
}
