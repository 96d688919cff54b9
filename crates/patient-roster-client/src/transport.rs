//! Backend access.
//!
//! [`Transport`] is the seam between the remote controller and the wire.
//! [`HttpTransport`] speaks the JSON API with reqwest's blocking client.

use patient_roster_core::{Patient, PatientInput, PatientPage};
use reqwest::blocking::{multipart, Client, Response};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::query::QueryParams;

/// Operations the backend exposes.
pub trait Transport {
    /// `GET /patients?...`
    fn list_patients(&self, query: &QueryParams) -> ClientResult<PatientPage>;

    /// `GET /patients/{id}`
    fn get_patient(&self, id: &str) -> ClientResult<Patient>;

    /// `POST /patients`
    fn create_patient(&self, input: &PatientInput) -> ClientResult<Patient>;

    /// `PUT /patients/{id}`
    fn update_patient(&self, id: &str, input: &PatientInput) -> ClientResult<Patient>;

    /// `DELETE /patients/{id}`; `false` when no record had that id.
    fn delete_patient(&self, id: &str) -> ClientResult<bool>;

    /// `POST /import_csv`; returns how many records the backend inserted.
    fn import_csv(&self, file_name: &str, contents: Vec<u8>) -> ClientResult<usize>;

    /// `GET /export_csv`
    fn export_csv(&self) -> ClientResult<String>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Deserialize)]
struct DeleteBody {
    deleted: usize,
}

#[derive(Deserialize)]
struct ImportBody {
    inserted: usize,
}

/// JSON-over-HTTP transport.
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Self::from_parts(client, config)
    }

    fn from_parts(client: Client, config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            client,
            base: config.api_url()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{}{path}: {e}", self.base)))
    }

    /// `patients/{id}` with the id percent-encoded as one path segment.
    fn patient_url(&self, id: &str) -> ClientResult<Url> {
        let mut url = self.endpoint("patients")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .push(id);
        Ok(url)
    }
}

/// Pass successful responses through; turn anything else into
/// [`ClientError::Api`], preferring the backend's own `error` text.
fn check(
    response: Response,
    fallback: impl FnOnce(StatusCode) -> String,
) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .ok()
        .and_then(|body| body.error)
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| fallback(status));
    tracing::warn!(status = status.as_u16(), %message, "backend request failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

fn fixed(message: &'static str) -> impl FnOnce(StatusCode) -> String {
    move |_| message.to_string()
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("unknown status")
}

fn json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let text = response.text()?;
    Ok(serde_json::from_str(&text)?)
}

impl Transport for HttpTransport {
    fn list_patients(&self, query: &QueryParams) -> ClientResult<PatientPage> {
        let mut url = self.endpoint("patients")?;
        query.apply(&mut url);
        tracing::debug!(%url, "fetching patients");

        let response = self.client.get(url).send()?;
        let response = check(response, |status| {
            format!("Error fetching patients: {}", reason(status))
        })?;
        json(response)
    }

    fn get_patient(&self, id: &str) -> ClientResult<Patient> {
        let url = self.patient_url(id)?;
        tracing::debug!(%url, "loading patient");

        let response = self.client.get(url).send()?;
        json(check(response, fixed("Failed to load patient"))?)
    }

    fn create_patient(&self, input: &PatientInput) -> ClientResult<Patient> {
        let url = self.endpoint("patients")?;
        tracing::debug!(%url, "creating patient");

        let response = self.client.post(url).json(input).send()?;
        json(check(response, fixed("Failed to save patient"))?)
    }

    fn update_patient(&self, id: &str, input: &PatientInput) -> ClientResult<Patient> {
        let url = self.patient_url(id)?;
        tracing::debug!(%url, "updating patient");

        let response = self.client.put(url).json(input).send()?;
        json(check(response, fixed("Failed to save patient"))?)
    }

    fn delete_patient(&self, id: &str) -> ClientResult<bool> {
        let url = self.patient_url(id)?;
        tracing::debug!(%url, "deleting patient");

        let response = self.client.delete(url).send()?;
        let body: DeleteBody = json(check(response, fixed("Failed to delete patient"))?)?;
        Ok(body.deleted > 0)
    }

    fn import_csv(&self, file_name: &str, contents: Vec<u8>) -> ClientResult<usize> {
        let url = self.endpoint("import_csv")?;
        tracing::debug!(%url, file_name, bytes = contents.len(), "uploading CSV");

        let part = multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);

        let response = self.client.post(url).multipart(form).send()?;
        let body: ImportBody = json(check(response, fixed("Failed to import CSV"))?)?;
        Ok(body.inserted)
    }

    fn export_csv(&self) -> ClientResult<String> {
        let url = self.endpoint("export_csv")?;
        tracing::debug!(%url, "downloading CSV");

        let response = self.client.get(url).send()?;
        Ok(check(response, fixed("Failed to export CSV"))?.text()?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use patient_roster_core::PatientForm;

    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(&ClientConfig {
            api_base: base.into(),
            ..Default::default()
        })
        .unwrap()
    }

    /// One-shot HTTP server on a loopback port. Reads a single request,
    /// answers with the canned response and hands back the request line.
    fn serve_once(
        status: &str,
        content_type: &str,
        body: &str,
    ) -> (HttpTransport, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let config = ClientConfig {
            api_base: format!("http://{}", listener.local_addr().unwrap()),
            ..Default::default()
        };
        let client = Client::builder().no_proxy().build().unwrap();
        let transport = HttpTransport::from_parts(client, &config).unwrap();

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            let mut length = 0;
            let mut chunked = false;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                let header = header.trim_end().to_ascii_lowercase();
                if header.is_empty() {
                    break;
                }
                if let Some(value) = header.strip_prefix("content-length:") {
                    length = value.trim().parse().unwrap();
                }
                if header.starts_with("transfer-encoding:") && header.contains("chunked") {
                    chunked = true;
                }
            }

            if chunked {
                loop {
                    let mut size = String::new();
                    reader.read_line(&mut size).unwrap();
                    let size = usize::from_str_radix(size.trim(), 16).unwrap();
                    let mut chunk = vec![0; size + 2];
                    reader.read_exact(&mut chunk).unwrap();
                    if size == 0 {
                        break;
                    }
                }
            } else {
                let mut body = vec![0; length];
                reader.read_exact(&mut body).unwrap();
            }

            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request_line.trim_end().to_string()
        });

        (transport, handle)
    }

    fn jane() -> PatientInput {
        PatientForm {
            name: "Jane Smith".into(),
            age: "45".into(),
            gender: "Female".into(),
            department: "Cardiology".into(),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_endpoints_keep_base_path() {
        let t = transport("http://ward.local:8080/api");
        assert_eq!(
            t.endpoint("patients").unwrap().as_str(),
            "http://ward.local:8080/api/patients"
        );
        assert_eq!(
            t.endpoint("import_csv").unwrap().as_str(),
            "http://ward.local:8080/api/import_csv"
        );
    }

    #[test]
    fn test_patient_id_is_one_segment() {
        let t = transport("http://localhost:5000/");
        assert_eq!(
            t.patient_url("65a1f0c2e4b0").unwrap().as_str(),
            "http://localhost:5000/patients/65a1f0c2e4b0"
        );
        assert_eq!(
            t.patient_url("a/b c").unwrap().as_str(),
            "http://localhost:5000/patients/a%2Fb%20c"
        );
    }

    #[test]
    fn test_reason_text() {
        assert_eq!(reason(StatusCode::NOT_FOUND), "Not Found");
        assert_eq!(reason(StatusCode::INTERNAL_SERVER_ERROR), "Internal Server Error");
    }

    #[test]
    fn test_backend_error_text_is_surfaced() {
        let (t, server) = serve_once(
            "400 Bad Request",
            "application/json",
            r#"{"error":"Missing field: name"}"#,
        );

        let err = t.create_patient(&jane()).unwrap_err();
        assert_eq!(server.join().unwrap(), "POST /patients HTTP/1.1");
        assert!(matches!(err, ClientError::Api { status: 400, .. }));
        assert_eq!(err.to_string(), "Missing field: name");
    }

    #[test]
    fn test_non_json_failure_uses_status_reason() {
        let (t, server) = serve_once("500 Internal Server Error", "text/html", "<h1>oops</h1>");

        let err = t.list_patients(&QueryParams::unfiltered(1, 10)).unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, ClientError::Api { status: 500, .. }));
        assert_eq!(
            err.to_string(),
            "Error fetching patients: Internal Server Error"
        );
    }

    #[test]
    fn test_list_parses_page() {
        let body = r#"{
            "items": [{
                "id": "65a1f0c2e4b0a1b2c3d4e5f6",
                "name": "Jane Smith",
                "age": 45,
                "gender": "Female",
                "department": "Cardiology",
                "phone": "",
                "address": "",
                "notes": "",
                "admission_date": "2024-01-15T10:30:00",
                "status": "admitted"
            }],
            "total": 11,
            "page": 2,
            "per_page": 10
        }"#;
        let (t, server) = serve_once("200 OK", "application/json", body);

        let page = t.list_patients(&QueryParams::unfiltered(2, 10)).unwrap();
        assert_eq!(
            server.join().unwrap(),
            "GET /patients?page=2&per_page=10 HTTP/1.1"
        );
        assert_eq!((page.total, page.page, page.per_page), (11, 2, 10));
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Jane Smith");
        assert_eq!(page.items[0].phone, None);
    }

    #[test]
    fn test_import_returns_inserted_count() {
        let (t, server) = serve_once("200 OK", "application/json", r#"{"inserted":3}"#);

        let inserted = t
            .import_csv("patients.csv", b"Jane Smith,45,Female,Cardiology,,\n".to_vec())
            .unwrap();
        assert_eq!(server.join().unwrap(), "POST /import_csv HTTP/1.1");
        assert_eq!(inserted, 3);
    }

    #[test]
    fn test_delete_reads_deleted_count() {
        let (t, server) = serve_once("200 OK", "application/json", r#"{"deleted":0}"#);
        assert!(!t.delete_patient("65a1f0c2e4b0a1b2c3d4e5f6").unwrap());
        assert_eq!(
            server.join().unwrap(),
            "DELETE /patients/65a1f0c2e4b0a1b2c3d4e5f6 HTTP/1.1"
        );

        let (t, server) = serve_once("200 OK", "application/json", r#"{"deleted":1}"#);
        assert!(t.delete_patient("65a1f0c2e4b0a1b2c3d4e5f6").unwrap());
        server.join().unwrap();
    }
}
