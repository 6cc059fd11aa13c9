//! Media command handlers.

use bytesize::ByteSize;
use tabled::Tabled;

use lendops_api::{ApiClient, FileUpload, MediaFile};

use crate::cli::{GlobalOpts, MediaArgs, MediaCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct MediaRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "File")]
    file_name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Type")]
    content_type: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Uploaded")]
    uploaded: String,
}

impl From<&MediaFile> for MediaRow {
    fn from(m: &MediaFile) -> Self {
        Self {
            id: m.id.clone(),
            file_name: m.file_name.clone(),
            category: m.category.clone().unwrap_or_default(),
            content_type: m.content_type.clone().unwrap_or_default(),
            size: m.size.map(human_size).unwrap_or_default(),
            uploaded: m
                .uploaded_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Binary units, the way file managers report scan sizes.
fn human_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string_as(true)
}

fn media_detail(m: &MediaFile) -> String {
    output::detail(&[
        ("ID", m.id.clone()),
        ("File", m.file_name.clone()),
        ("Type", m.content_type.clone().unwrap_or_default()),
        ("Size", m.size.map(human_size).unwrap_or_default()),
        ("Category", m.category.clone().unwrap_or_default()),
        ("Reference", m.reference_id.clone().unwrap_or_default()),
        ("Uploaded", output::opt(m.uploaded_at.as_ref())),
        ("URL", m.url.clone().unwrap_or_default()),
    ])
}

fn print_media(media: &MediaFile, global: &GlobalOpts) {
    let out = output::render_single(global.format(), media, media_detail, |m| m.id.clone());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &ApiClient, args: MediaArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        MediaCommand::Upload {
            path,
            category,
            reference_id,
            content_type,
        } => {
            let bytes = std::fs::read(&path)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| CliError::Validation {
                    field: "path".into(),
                    reason: format!("'{}' does not name a file", path.display()),
                })?;
            let upload = FileUpload {
                file_name,
                content_type,
                bytes,
                category,
                reference_id,
            };
            let media = client.upload_file(upload).await?;
            output::print_done(
                &format!("Uploaded {} as {}", media.file_name, media.id),
                global.quiet,
            );
            print_media(&media, global);
            Ok(())
        }

        MediaCommand::List { reference_id } => {
            let files = client.list_media(&reference_id).await?;
            let out = output::render_list(
                global.format(),
                &files,
                |m| MediaRow::from(m),
                |m| m.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MediaCommand::Get { id } => {
            let media = client.get_media(&id).await?;
            print_media(&media, global);
            Ok(())
        }

        MediaCommand::Delete { id } => {
            if !util::confirm(&format!("Delete document {id}?"), "media delete", global.yes)? {
                return Ok(());
            }
            client.delete_media(&id).await?;
            output::print_done(&format!("Document {id} deleted"), global.quiet);
            Ok(())
        }
    }
}
