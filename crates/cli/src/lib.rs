//! Command implementations behind the `roi` binary.
//!
//! Every command writes to the given `out` so it can be driven from tests.

pub mod args;

use std::fs;
use std::io::Write;
use std::path::Path;

use analysis_engine::format::{currency, percent, ratio};
use analysis_engine::{compute, render_report};
use anyhow::{anyhow, bail, Context, Result};
use models::{parse_number, InputSnapshot, MetricsSnapshot, Scenario};
use scenario_store::{KeyValueStore, ScenarioStore, Session};

use crate::args::{ScenarioCommand, UnitCommand, UnitFields};

/// Reads an input file. Fields it does not mention keep their defaults.
pub fn read_input(path: &Path) -> Result<InputSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading input file: {}", path.display()))?;
    let input: InputSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing input JSON in {}", path.display()))?;
    Ok(input)
}

pub fn write_input(path: &Path, input: &InputSnapshot, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating output dir: {}", parent.display()))?;
        }
    }
    let json = if pretty {
        serde_json::to_string_pretty(input)?
    } else {
        serde_json::to_string(input)?
    };
    fs::write(path, json).with_context(|| format!("Writing input file: {}", path.display()))?;
    Ok(())
}

fn edit_input<F>(path: &Path, pretty: bool, edit: F) -> Result<InputSnapshot>
where
    F: FnOnce(&mut InputSnapshot) -> Result<()>,
{
    let mut input = read_input(path)?;
    edit(&mut input)?;
    write_input(path, &input, pretty)?;
    Ok(input)
}

pub fn template(out_path: &Path, force: bool, pretty: bool, out: &mut impl Write) -> Result<()> {
    if out_path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            out_path.display()
        );
    }
    write_input(out_path, &InputSnapshot::default(), pretty)?;
    writeln!(out, "Wrote default assumptions to {}", out_path.display())?;
    Ok(())
}

/// Headline figures, one per line.
pub fn write_summary(metrics: &MetricsSnapshot, out: &mut impl Write) -> Result<()> {
    let rows = [
        ("Potential Gross Income", currency(metrics.potential_gross_income)),
        ("Effective Gross Income", currency(metrics.effective_gross_income)),
        ("Total Operating Expenses", currency(metrics.total_operating_expenses)),
        ("Net Operating Income", currency(metrics.net_operating_income)),
        ("Monthly Mortgage", currency(metrics.monthly_mortgage)),
        ("Annual Debt Service", currency(metrics.annual_debt_service)),
        ("Annual Cash Flow", currency(metrics.annual_cash_flow)),
        ("Cash-on-Cash ROI", percent(metrics.cash_on_cash_roi)),
        ("Cap Rate", percent(metrics.cap_rate)),
        ("Gross Rent Multiplier", ratio(metrics.gross_rent_multiplier)),
        ("OpEx Ratio", percent(metrics.opex_ratio)),
        (
            "DSCR",
            format!("{} ({})", ratio(metrics.dscr), metrics.dscr_status),
        ),
    ];
    for (label, value) in rows {
        writeln!(out, "{:<26}{}", format!("{label}:"), value)?;
    }
    Ok(())
}

pub fn analyze(input_path: &Path, json: bool, pretty: bool, out: &mut impl Write) -> Result<()> {
    let metrics = compute(&read_input(input_path)?);
    if json {
        let text = if pretty {
            serde_json::to_string_pretty(&metrics)?
        } else {
            serde_json::to_string(&metrics)?
        };
        writeln!(out, "{text}")?;
    } else {
        write_summary(&metrics, out)?;
    }
    Ok(())
}

pub fn report(input_path: &Path, out_path: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let input = read_input(input_path)?;
    let text = render_report(&input, &compute(&input));
    match out_path {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Writing report: {}", path.display()))?;
            writeln!(out, "Report written to {}", path.display())?;
        }
        None => write!(out, "{text}")?,
    }
    Ok(())
}

pub fn set_field(
    input_path: &Path,
    field: &str,
    value: &str,
    pretty: bool,
    out: &mut impl Write,
) -> Result<()> {
    edit_input(input_path, pretty, |input| {
        input
            .set_field(field, value)
            .map_err(|e| anyhow!("{e}; known fields: {}", models::FIELD_NAMES.join(", ")))
    })?;
    writeln!(out, "Set {field} in {}", input_path.display())?;
    Ok(())
}

pub fn set_mode(
    input_path: &Path,
    mode: models::ManagementMode,
    pretty: bool,
    out: &mut impl Write,
) -> Result<()> {
    let input = edit_input(input_path, pretty, |input| {
        input.set_management_mode(mode);
        Ok(())
    })?;
    let value = match input.management_fee() {
        models::ManagementFee::PercentOfGross(pct) => percent(pct),
        models::ManagementFee::Flat(amount) => currency(amount),
    };
    writeln!(out, "Management fee is now {mode} ({value})")?;
    Ok(())
}

fn apply_unit_fields(unit: &mut models::Unit, fields: &UnitFields) {
    if let Some(raw) = &fields.bedrooms {
        unit.bedrooms = parse_number(raw).max(0.0) as u32;
    }
    if let Some(raw) = &fields.bathrooms {
        unit.bathrooms = parse_number(raw);
    }
    if let Some(raw) = &fields.rent {
        unit.rent = parse_number(raw);
    }
}

pub fn unit(cmd: &UnitCommand, pretty: bool, out: &mut impl Write) -> Result<()> {
    match cmd {
        UnitCommand::Add { input, fields } => {
            let mut added = 0;
            edit_input(input, pretty, |snapshot| {
                added = snapshot.add_unit().id;
                if let Some(unit) = snapshot.unit_mut(added) {
                    apply_unit_fields(unit, fields);
                }
                Ok(())
            })?;
            writeln!(out, "Added unit {added}")?;
        }
        UnitCommand::Remove { input, id } => {
            edit_input(input, pretty, |snapshot| {
                if snapshot.remove_unit(*id) {
                    Ok(())
                } else {
                    Err(anyhow!("No unit with id {id}"))
                }
            })?;
            writeln!(out, "Removed unit {id}")?;
        }
        UnitCommand::Set { input, id, fields } => {
            edit_input(input, pretty, |snapshot| {
                let unit = snapshot
                    .unit_mut(*id)
                    .ok_or_else(|| anyhow!("No unit with id {id}"))?;
                apply_unit_fields(unit, fields);
                Ok(())
            })?;
            writeln!(out, "Updated unit {id}")?;
        }
    }
    Ok(())
}

fn ensure_synced<S: KeyValueStore>(store: &ScenarioStore<S>) -> Result<()> {
    if !store.is_synced() {
        bail!(
            "Scenario change could not be written under '{}'; see the log for details",
            store.key()
        );
    }
    Ok(())
}

fn scenario_line(scenario: &Scenario) -> String {
    let metrics = compute(&scenario.data);
    format!(
        "{:<15} {:<24} {:<12} CoC {:>8}  Cap {:>7}  DSCR {} ({})",
        scenario.id,
        scenario.name,
        scenario.created_at.format("%Y-%m-%d").to_string(),
        percent(metrics.cash_on_cash_roi),
        percent(metrics.cap_rate),
        ratio(metrics.dscr),
        metrics.dscr_status
    )
}

pub fn scenario<S: KeyValueStore>(
    cmd: &ScenarioCommand,
    session: &mut Session<S>,
    pretty: bool,
    out: &mut impl Write,
) -> Result<()> {
    match cmd {
        ScenarioCommand::List => {
            let scenarios = session.store().scenarios();
            if scenarios.is_empty() {
                writeln!(out, "No saved scenarios.")?;
            }
            for scenario in scenarios {
                writeln!(out, "{}", scenario_line(scenario))?;
            }
        }
        ScenarioCommand::Save { name, input } => {
            session.replace_current(read_input(input)?);
            let created = session.save_as_new(name);
            ensure_synced(session.store())?;
            writeln!(out, "Saved scenario {} ({})", created.id, created.name)?;
        }
        ScenarioCommand::Update { id, input } => {
            if !session.select(*id) {
                bail!("No scenario with id {id}");
            }
            session.replace_current(read_input(input)?);
            let saved = session
                .save()
                .ok_or_else(|| anyhow!("No scenario with id {id}"))?;
            ensure_synced(session.store())?;
            writeln!(out, "Updated scenario {} ({})", saved.id, saved.name)?;
        }
        ScenarioCommand::Delete { id } => {
            if !session.delete(*id) {
                bail!("No scenario with id {id}");
            }
            ensure_synced(session.store())?;
            writeln!(out, "Deleted scenario {id}")?;
        }
        ScenarioCommand::Show { id, report } => {
            if !session.select(*id) {
                bail!("No scenario with id {id}");
            }
            if *report {
                write!(out, "{}", session.report())?;
            } else {
                if let Some(selected) = session.selected() {
                    writeln!(out, "{}", selected.name)?;
                }
                write_summary(&session.metrics(), out)?;
            }
        }
        ScenarioCommand::Export { id, out: out_path } => {
            if !session.select(*id) {
                bail!("No scenario with id {id}");
            }
            write_input(out_path, session.current(), pretty)?;
            writeln!(out, "Exported scenario {id} to {}", out_path.display())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_store::MemoryStore;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    fn memory_session() -> Session<MemoryStore> {
        Session::new(ScenarioStore::open(MemoryStore::new(), "scenarios"))
    }

    fn deal_file(dir: &Path) -> PathBuf {
        let path = dir.join("deal.json");
        let mut buf = Vec::new();
        template(&path, false, true, &mut buf).unwrap();
        path
    }

    #[test]
    fn test_template_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = deal_file(dir.path());
        assert_eq!(read_input(&path).unwrap(), InputSnapshot::default());
        assert!(template(&path, false, true, &mut Vec::new()).is_err());
        assert!(template(&path, true, true, &mut Vec::new()).is_ok());
    }

    #[test]
    fn test_analyze_summary_and_json() {
        let dir = tempdir().unwrap();
        let path = deal_file(dir.path());

        let mut buf = Vec::new();
        analyze(&path, false, true, &mut buf).unwrap();
        let text = output(buf);
        assert!(text.contains("Net Operating Income:     $34,442.00\n"));
        assert!(text.contains("DSCR:                     1.21 (Borderline)\n"));

        let mut buf = Vec::new();
        analyze(&path, true, false, &mut buf).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output(buf)).unwrap();
        assert_eq!(json["netOperatingIncome"], 34442.0);
        assert_eq!(json["dscrStatus"], "Borderline");
    }

    #[test]
    fn test_partial_input_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"purchasePrice": "n/a", "units": []}"#).unwrap();

        let input = read_input(&path).unwrap();
        assert_eq!(input.purchase_price, 0.0);
        assert_eq!(input.down_payment, 125_000.0);
        assert!(input.units.is_empty());
    }

    #[test]
    fn test_missing_input_file_names_path() {
        let err = read_input(Path::new("/no/such/deal.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/no/such/deal.json"));
    }

    #[test]
    fn test_report_to_file() {
        let dir = tempdir().unwrap();
        let path = deal_file(dir.path());
        let report_path = dir.path().join("report.txt");

        report(&path, Some(&report_path), &mut Vec::new()).unwrap();
        let text = fs::read_to_string(&report_path).unwrap();
        assert!(text.starts_with(&"=".repeat(56)));
        assert!(text.contains("KEY PERFORMANCE INDICATORS"));
    }

    #[test]
    fn test_field_mode_and_unit_edits() {
        let dir = tempdir().unwrap();
        let path = deal_file(dir.path());
        let mut sink = Vec::new();

        set_field(&path, "managementFlat", "3600", true, &mut sink).unwrap();
        assert!(set_field(&path, "bogus", "1", true, &mut sink).is_err());
        set_mode(&path, models::ManagementMode::Flat, true, &mut sink).unwrap();

        let add = UnitCommand::Add {
            input: path.clone(),
            fields: UnitFields {
                bedrooms: Some("3".to_string()),
                bathrooms: Some("2".to_string()),
                rent: Some("1750".to_string()),
            },
        };
        unit(&add, true, &mut sink).unwrap();
        unit(
            &UnitCommand::Set {
                input: path.clone(),
                id: 5,
                fields: UnitFields {
                    rent: Some("1800".to_string()),
                    ..Default::default()
                },
            },
            true,
            &mut sink,
        )
        .unwrap();
        unit(&UnitCommand::Remove { input: path.clone(), id: 1 }, true, &mut sink).unwrap();
        assert!(unit(&UnitCommand::Remove { input: path.clone(), id: 1 }, true, &mut sink).is_err());

        let input = read_input(&path).unwrap();
        assert_eq!(input.management_fee(), models::ManagementFee::Flat(3_600.0));
        assert_eq!(input.management_percent, 8.0);
        let ids: Vec<u32> = input.units.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5]);
        assert_eq!(input.units[3], models::Unit::new(5, 3, 2.0, 1_800.0));
    }

    #[test]
    fn test_scenario_lifecycle() {
        let dir = tempdir().unwrap();
        let path = deal_file(dir.path());
        let mut session = memory_session();
        let mut sink = Vec::new();

        scenario(
            &ScenarioCommand::Save { name: "Base".to_string(), input: path.clone() },
            &mut session,
            true,
            &mut sink,
        )
        .unwrap();
        let id = session.store().scenarios()[0].id;

        set_field(&path, "interestRate", "7", true, &mut sink).unwrap();
        scenario(&ScenarioCommand::Update { id, input: path.clone() }, &mut session, true, &mut sink)
            .unwrap();
        assert_eq!(session.store().find(id).unwrap().data.interest_rate, 7.0);

        let mut buf = Vec::new();
        scenario(&ScenarioCommand::List, &mut session, true, &mut buf).unwrap();
        let listing = output(buf);
        assert!(listing.contains(&id.to_string()));
        assert!(listing.contains("Base"));

        let exported = dir.path().join("exported.json");
        scenario(&ScenarioCommand::Export { id, out: exported.clone() }, &mut session, true, &mut sink)
            .unwrap();
        assert_eq!(read_input(&exported).unwrap().interest_rate, 7.0);

        let mut buf = Vec::new();
        scenario(&ScenarioCommand::Show { id, report: true }, &mut session, true, &mut buf).unwrap();
        assert!(output(buf).contains("Interest Rate:                7.00%"));

        scenario(&ScenarioCommand::Delete { id }, &mut session, true, &mut sink).unwrap();
        assert!(scenario(&ScenarioCommand::Delete { id }, &mut session, true, &mut sink).is_err());
        assert!(scenario(&ScenarioCommand::Update { id, input: path }, &mut session, true, &mut sink)
            .is_err());

        let mut buf = Vec::new();
        scenario(&ScenarioCommand::List, &mut session, true, &mut buf).unwrap();
        assert_eq!(output(buf), "No saved scenarios.\n");
    }

    #[test]
    fn test_failed_write_is_reported() {
        let dir = tempdir().unwrap();
        let path = deal_file(dir.path());
        let mut session = Session::new(ScenarioStore::open(MemoryStore::with_quota(16), "scenarios"));

        let err = scenario(
            &ScenarioCommand::Save { name: "Big".to_string(), input: path },
            &mut session,
            true,
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("could not be written"));
        // The attempted save is still visible in memory
        assert_eq!(session.store().scenarios().len(), 1);
    }
}
