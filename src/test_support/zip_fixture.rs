#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::path::Path;

use zip::ZipWriter;
use zip::unstable::write::FileOptionsExt;
use zip::write::SimpleFileOptions;

/// One entry of a fixture archive: names ending in `/` are directories.
pub type Entry<'a> = (&'a str, &'a [u8]);

/// Writes a zip with the given entries, in order.
pub fn write_zip(path: &Path, entries: &[Entry<'_>]) {
    write_zip_with_password(path, entries, None);
}

/// Writes a zip whose file entries are ZipCrypto-encrypted when `password` is set.
#[allow(deprecated)]
pub fn write_zip_with_password(path: &Path, entries: &[Entry<'_>], password: Option<&str>) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    for (name, contents) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(*name, SimpleFileOptions::default())
                .unwrap();
            continue;
        }
        match password {
            Some(pw) => {
                let options = SimpleFileOptions::default().with_deprecated_encryption(pw.as_bytes());
                writer.start_file(*name, options).unwrap();
            }
            None => writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap(),
        }
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap();
}
