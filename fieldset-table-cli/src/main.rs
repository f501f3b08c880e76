use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use fieldset_table::error::ServiceError;
use fieldset_table::error::TableError;
use fieldset_table::service::JsonFileSource;
use fieldset_table::service::RecordQuery;
use fieldset_table::service::TableController;
use fieldset_table::table::Column;
use fieldset_table::table::TableConfig;
use fieldset_table::table::TableViewModel;
use fieldset_table::PageEventBus;
use log::info;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

/// Render a field set table from JSON files.
#[derive(Debug, Parser)]
#[command(name = "fieldset-table", version, about)]
struct Args {
    /// Field set members (array, or object keyed by `Object.FieldSet`)
    #[arg(long, value_name = "PATH")]
    fields: PathBuf,

    /// Records (array, or query result with a `records` array)
    #[arg(long, value_name = "PATH")]
    records: PathBuf,

    /// Table settings as camelCase JSON
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Object name, overrides the settings file
    #[arg(long)]
    object: Option<String>,

    /// Field set name, overrides the settings file
    #[arg(long)]
    field_set: Option<String>,

    /// Click a column header (repeatable, applied in order)
    #[arg(long = "sort", value_name = "FIELD")]
    sorts: Vec<String>,

    /// Drag the row at FROM onto TO, 0-based (repeatable)
    #[arg(long = "move", value_name = "FROM:TO", value_parser = parse_move)]
    moves: Vec<(usize, usize)>,

    /// Page to print
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Write rows whose rank changed to this file
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Log file
    #[arg(long, value_name = "PATH", default_value = "fieldset-table.log")]
    log_file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Table(#[from] TableError),
}

fn parse_move(value: &str) -> Result<(usize, usize), String> {
    let (from, to) = value
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got '{value}'"))?;
    let from = from.trim().parse().map_err(|e| format!("bad FROM: {e}"))?;
    let to = to.trim().parse().map_err(|e| format!("bad TO: {e}"))?;
    Ok((from, to))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    WriteLogger::init(LevelFilter::Debug, Config::default(), File::create(&args.log_file)?)?;

    let mut config = match &args.config {
        Some(path) => serde_json::from_slice::<TableConfig>(&tokio::fs::read(path).await?)?,
        None => TableConfig::default(),
    };
    if let Some(object) = args.object {
        config.object_name = Some(object);
    }
    if let Some(field_set) = args.field_set {
        config.field_set_name = Some(field_set);
    }

    let mut source = JsonFileSource::new(&args.fields, &args.records);
    if let Some(save) = &args.save {
        source = source.with_save_path(save);
    }

    let events = PageEventBus::new();
    if let Some(event) = config.drop_event_name.clone() {
        events.register_listener(event.clone(), "cli", move |rows| {
            info!("{event}: {} rows reordered", rows.len());
        });
    }

    let controller = TableController::from_source(Arc::new(source)).with_event_bus(events);
    let query = RecordQuery::for_table(&config)?;
    let mut table = controller.load(config, &query).await?;

    for field in &args.sorts {
        table.click_column(field)?;
    }
    for &(from, to) in &args.moves {
        table.start_drag(from)?;
        table.drop_on(to)?;
    }
    for _ in 1..args.page {
        table.page_forward();
    }

    print_page(&table);

    if args.save.is_some() {
        let saved = controller.save_changes(&table).await?;
        println!("Saved {saved} changed records");
    }
    Ok(())
}

fn header_label(column: &Column) -> String {
    if column.is_sort() {
        format!("{} ({})", column.label(), column.sort_icon().icon_name())
    } else {
        column.label().to_string()
    }
}

fn print_page(table: &TableViewModel) {
    if let Some(header) = &table.config().table_header {
        println!("{header}");
    }
    if !table.has_data() {
        println!("{}", table.config().no_data_label);
        return;
    }

    let labels: Vec<String> = table
        .columns()
        .iter()
        .map(header_label)
        .collect();
    println!("{}", labels.join(" | "));

    for row in table.visible_rows() {
        let mut line = row.display_values().join(" | ");
        let classes = row.class_list();
        if !classes.is_empty() {
            line.push_str(&format!("  [{classes}]"));
        }
        println!("{line}");
    }

    if table.display_footer() {
        println!("Page {} of {}", table.current_page(), table.total_pages());
    }
}

#[cfg(test)]
mod tests {
    use fieldset_table::model::FieldDescriptor;
    use fieldset_table::model::FieldType;
    use fieldset_table::model::Record;

    use super::*;

    #[test]
    fn test_header_label_marks_the_sorted_column() {
        let fields = vec![
            FieldDescriptor::new("Name", FieldType::String).with_label("Name"),
            FieldDescriptor::new("Amount", FieldType::Double).with_label("Amount"),
        ];
        let records = vec![Record::new("Opportunity").set("Id", "0061").set("Amount", 1.0)];
        let mut table = TableViewModel::build(TableConfig::default(), &records, &fields);
        table.click_column("Amount").unwrap();

        let labels: Vec<String> = table.columns().iter().map(header_label).collect();
        assert_eq!(labels, ["Name", "Amount (utility:arrowdown)"]);
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("3:1"), Ok((3, 1)));
        assert!(parse_move("3").is_err());
    }
}
