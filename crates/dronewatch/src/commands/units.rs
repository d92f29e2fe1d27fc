//! One-shot unit listing and per-unit detail view.

use std::collections::HashMap;

use tabled::Tabled;

use dronewatch_api::DashboardClient;
use dronewatch_core::{SyncEngine, UnitSnapshot, UnitView};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
pub struct UnitRow {
    #[tabled(rename = "SERIAL")]
    pub serial: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "SPD")]
    pub speed: String,
    #[tabled(rename = "PWR")]
    pub power: String,
    #[tabled(rename = "LAT")]
    pub latitude: String,
    #[tabled(rename = "LNG")]
    pub longitude: String,
    #[tabled(rename = "PERSONS")]
    pub persons: String,
    #[tabled(rename = "EVENT")]
    pub event: String,
    #[tabled(rename = "NEW")]
    pub unread: String,
    #[tabled(rename = "UPDATED")]
    pub updated: String,
}

pub fn unit_row(unit: &UnitSnapshot, unread: u32) -> UnitRow {
    UnitRow {
        serial: unit.serial.clone(),
        name: unit.name.clone(),
        speed: output::fmt_f64(unit.telemetry.speed, 1),
        power: output::fmt_f64(unit.telemetry.power, 0),
        latitude: output::fmt_f64(unit.telemetry.latitude, 5),
        longitude: output::fmt_f64(unit.telemetry.longitude, 5),
        persons: output::fmt_u32(unit.telemetry.person_count),
        event: unit.event.detail.message.clone(),
        unread: if unread == 0 {
            String::new()
        } else {
            unread.to_string()
        },
        updated: output::fmt_time(unit.last_update),
    }
}

/// Run one poll cycle and render the roster, or one unit's detail view.
pub async fn handle(
    client: DashboardClient,
    serial: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !client.has_token() {
        return Err(CliError::NoSession);
    }

    let engine = SyncEngine::new(client);
    let units = engine.refresh_all().await?;

    match serial {
        Some(serial) => {
            engine.set_selected_unit(Some(&serial)).await;
            let view = engine
                .display_state()
                .await
                .ok_or_else(|| CliError::Validation {
                    field: "serial".into(),
                    reason: format!("no active unit {serial:?}"),
                })?;
            println!(
                "{}",
                output::render_single(global.output, &view, detail_view, |v| v.serial.clone())
            );
        }
        None => {
            let unread = engine.unread_counts().await;
            println!("{}", render_units(global.output, &units, &unread));
        }
    }

    Ok(())
}

pub fn render_units(
    format: OutputFormat,
    units: &[UnitSnapshot],
    unread: &HashMap<String, u32>,
) -> String {
    output::render_list(
        format,
        units,
        |u| unit_row(u, unread.get(&u.serial).copied().unwrap_or(0)),
        |u| u.serial.clone(),
    )
}

fn detail_view(view: &UnitView) -> String {
    let mut out = String::new();
    let feed = if view.is_live { "LIVE" } else { "PINNED" };

    out.push_str(&format!("{}  [{feed}]\n", view.name));
    out.push_str(&format!("  serial    {}\n", view.serial));
    out.push_str(&format!("  updated   {}\n", output::fmt_time(view.timestamp)));
    out.push_str(&format!(
        "  position  {}, {}\n",
        output::fmt_f64(view.telemetry.latitude, 5),
        output::fmt_f64(view.telemetry.longitude, 5),
    ));
    out.push_str(&format!(
        "  speed     {} km/h\n",
        output::fmt_f64(view.telemetry.speed, 1)
    ));
    out.push_str(&format!(
        "  power     {} %\n",
        output::fmt_f64(view.telemetry.power, 0)
    ));
    out.push_str(&format!(
        "  persons   {}\n",
        output::fmt_u32(view.telemetry.person_count)
    ));
    out.push_str(&format!("  report    {}", view.event.detail.message));
    if let Some(severity) = view.event.severity {
        out.push_str(&format!(" [{severity}]"));
    }
    if !view.event.detail.image.is_empty() {
        out.push_str(&format!("\n  frame     {}", view.event.detail.image));
    }
    out
}
