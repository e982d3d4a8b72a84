//! QR code management commands

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::services::{CreateQrRequest, ListQuery, QrService, QrView};

fn describe(qr: &QrView) -> String {
    let target = qr
        .destination_url
        .as_deref()
        .or(qr.static_data.as_deref())
        .unwrap_or("-");

    let mut parts = vec![format!(
        "{} {} -> {}",
        qr.short_code.cyan(),
        qr.name.bold(),
        target.blue().underline()
    )];

    parts.push(format!("[{}]", qr.qr_type).dimmed().to_string());

    if let Some(expires_at) = &qr.expires_at {
        parts.push(
            format!("(expires: {})", expires_at)
                .dimmed()
                .yellow()
                .to_string(),
        );
    }

    if !qr.is_active {
        parts.push("(inactive)".red().to_string());
    } else if qr.is_paused {
        parts.push("(paused)".yellow().to_string());
    }

    if qr.scan_count > 0 {
        parts.push(
            format!("(scans: {})", qr.scan_count)
                .dimmed()
                .cyan()
                .to_string(),
        );
    }

    parts.join(" ")
}

pub async fn list_qr(
    service: Arc<QrService>,
    owner: String,
    page: u64,
    limit: u64,
    search: Option<String>,
) -> Result<(), CliError> {
    let result = service
        .list(
            &owner,
            ListQuery {
                page: Some(page),
                limit: Some(limit),
                search,
                ..ListQuery::default()
            },
        )
        .await?;

    if result.items.is_empty() {
        println!("{} No QR codes found for {}", "ℹ".bold().blue(), owner.cyan());
        return Ok(());
    }

    println!("{}", "QR code list:".bold().green());
    println!();
    for qr in &result.items {
        println!("  {}", describe(qr));
        println!("    {}", qr.id.dimmed());
    }
    println!();
    println!(
        "{} Page {}/{}, total {} QR codes",
        "ℹ".bold().blue(),
        result.pagination.page,
        result.pagination.total_pages.max(1),
        result.pagination.total.to_string().green()
    );
    Ok(())
}

pub async fn create_qr(
    service: Arc<QrService>,
    owner: String,
    req: CreateQrRequest,
) -> Result<(), CliError> {
    let view = service.create(&owner, req).await?;

    println!(
        "{} Created QR code: {}",
        "✓".bold().green(),
        view.short_code.cyan()
    );
    println!("  {}", describe(&view));
    println!("  {} {}", "id:".dimmed(), view.id);
    println!("  {} {}", "redirect:".dimmed(), view.redirect_url.blue());
    println!("  {} {}", "image:".dimmed(), view.image_url.blue());
    Ok(())
}

pub async fn delete_qr(service: Arc<QrService>, owner: String, id: String) -> Result<(), CliError> {
    service.delete(&owner, &id).await?;
    println!("{} Deleted QR code: {}", "✓".bold().green(), id.cyan());
    Ok(())
}
