use actix_cors::Cors;
use actix_web::http::{header, uri::Uri};
use log::{info, warn};
use std::{
    fs::File,
    io::{BufRead, BufReader, Error as IOError, ErrorKind},
    path::Path,
};

/// Reads allowed origins, one per line. Blank lines and `#` comments are
/// skipped, lines that are not valid URIs are dropped with a warning.
///
/// Fails if the file has entries but none of them is valid.
pub fn load_and_validate_cors_origins(path: impl AsRef<Path>) -> Result<Vec<String>, IOError> {
    let file = File::open(path)?;
    let buf_reader = BufReader::new(file);
    let mut origins = Vec::new();
    let mut seen_entries = false;

    for line in buf_reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        seen_entries = true;
        match line.parse::<Uri>() {
            Ok(_) => origins.push(line.to_string()),
            Err(e) => warn!("Invalid URI in CORS configuration '{}': {}", line, e),
        }
    }

    if seen_entries && origins.is_empty() {
        return Err(IOError::new(
            ErrorKind::InvalidData,
            "All CORS lines failed validation.",
        ));
    }

    Ok(origins)
}

/// Loads origins for the server, treating a missing file as "allow any".
pub fn origins_or_permissive(path: &str) -> Result<Vec<String>, IOError> {
    match load_and_validate_cors_origins(path) {
        Ok(origins) => {
            info!("CORS origins loaded from {}: {:?}", path, origins);
            Ok(origins)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("{} not found, CORS is permissive", path);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// An empty origin list means permissive CORS.
pub fn build_cors(origins: &[String]) -> Cors {
    if origins.is_empty() {
        return Cors::permissive();
    }

    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600);

    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
