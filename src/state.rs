use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::charts::{ChartKind, Figure};
use crate::config::AppConfig;
use crate::data::loader::{load_file, LoadOptions};
use crate::data::model::DataFrame;
use crate::error::LoadError;

pub const MSG_NO_FILE: &str = "Status: no file loaded";
pub const MSG_CHOOSE: &str = "Please choose a visualization.";
pub const MSG_NO_NUMERIC: &str = "No numeric data to visualize.";
pub const MSG_NO_DATA: &str = "No file loaded to visualize.";
pub const MSG_NOTHING_TO_CLEAN: &str = "No file to clean.";

// ---------------------------------------------------------------------------
// Transient status-bar message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    pub text: String,
    pub expires_at: Instant,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until a file loads successfully).
    pub dataset: Option<DataFrame>,

    /// Path of the file behind `dataset`.
    pub source: Option<PathBuf>,

    /// Chart picked in the selector; `None` is "Choose a visualization".
    pub chart_choice: Option<ChartKind>,

    /// Persistent status label of the side panel.
    pub status_label: String,

    /// Short-lived message in the bottom status bar.
    pub flash: Option<Flash>,

    /// Figure currently shown in the plot window. Blocks the main controls.
    pub figure: Option<Figure>,

    load_options: LoadOptions,
    flash_duration: Duration,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            dataset: None,
            source: None,
            chart_choice: None,
            status_label: MSG_NO_FILE.to_string(),
            flash: None,
            figure: None,
            load_options: LoadOptions::with_extra_na(config.extra_na_values.iter().cloned()),
            flash_duration: config.status_duration(),
        }
    }

    /// Load `path` and replace the dataset, or drop it on failure.
    pub fn load_path(&mut self, path: &Path) {
        let result = load_file(path, &self.load_options);
        self.apply_load(path, result);
    }

    /// Ingest the outcome of a load.
    pub fn apply_load(&mut self, path: &Path, result: Result<DataFrame, LoadError>) {
        match result {
            Ok(dataset) => {
                let (rows, cols) = dataset.shape();
                log::info!("Loaded {} ({rows} rows × {cols} columns)", path.display());
                log::debug!("Columns: {:?}", dataset.column_names());
                let message = format!("File loaded: {}", path.display());
                self.show_flash(message.clone(), Instant::now());
                self.status_label = message;
                self.dataset = Some(dataset);
                self.source = Some(path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_label = format!("Load failed: {e}");
                self.flash = None;
                self.dataset = None;
                self.source = None;
            }
        }
    }

    /// Build the selected chart over the numeric columns and open it.
    pub fn visualize(&mut self) {
        let Some(kind) = self.chart_choice else {
            self.status_label = MSG_CHOOSE.to_string();
            return;
        };
        let Some(dataset) = &self.dataset else {
            self.status_label = MSG_NO_DATA.to_string();
            return;
        };

        let numeric = dataset.select_numeric();
        if numeric.is_empty() {
            log::info!("{kind} requested but the table has no numeric data");
            self.status_label = MSG_NO_NUMERIC.to_string();
            return;
        }

        log::info!("Rendering {kind} over {} numeric columns", numeric.n_cols());
        self.figure = Some(Figure::build(kind, &numeric));
    }

    /// Drop every row with a missing value.
    pub fn clean(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.status_label = MSG_NOTHING_TO_CLEAN.to_string();
            return;
        };

        let (cleaned, removed) = dataset.drop_nulls();
        log::info!(
            "Dropped {removed} rows with missing values, {} remain",
            cleaned.n_rows()
        );
        self.dataset = Some(cleaned);
        self.status_label = format!("Cleaning succeeded: {removed} rows removed.");
    }

    pub fn close_figure(&mut self) {
        self.figure = None;
    }

    fn show_flash(&mut self, text: String, now: Instant) {
        self.flash = Some(Flash {
            text,
            expires_at: now + self.flash_duration,
        });
    }

    /// Status-bar text if it has not expired at `now`.
    pub fn active_flash(&self, now: Instant) -> Option<&str> {
        self.flash
            .as_ref()
            .filter(|f| now < f.expires_at)
            .map(|f| f.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, DType};
    use std::io::Write;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn loaded(contents: &str) -> (AppState, tempfile::NamedTempFile) {
        let file = csv_file(contents);
        let mut state = AppState::default();
        state.load_path(file.path());
        (state, file)
    }

    #[test]
    fn loading_valid_csv_sets_dataset_and_status() {
        let (state, file) = loaded("a,b\n1,x\n2,y\n");
        let ds = state.dataset.as_ref().unwrap();
        assert_eq!(ds.shape(), (2, 2));
        let expected = format!("File loaded: {}", file.path().display());
        assert_eq!(state.status_label, expected);
        assert_eq!(state.active_flash(Instant::now()), Some(expected.as_str()));
        assert_eq!(state.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn failed_load_discards_previous_dataset() {
        let (mut state, _file) = loaded("a\n1\n");
        assert!(state.dataset.is_some());
        assert!(state.active_flash(Instant::now()).is_some());

        let dir = tempfile::tempdir().unwrap();
        state.load_path(&dir.path().join("missing.csv"));
        assert!(state.dataset.is_none());
        assert!(state.source.is_none());
        assert!(state.status_label.starts_with("Load failed: "));
        assert!(state.flash.is_none());
        assert_eq!(state.active_flash(Instant::now()), None);
    }

    #[test]
    fn loading_xlsx_sets_dataset_and_status() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let stamp = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "x").unwrap();
        sheet.write_string(0, 1, "day").unwrap();
        sheet.write_string(0, 2, "note").unwrap();
        sheet.write_number(1, 0, 1.5).unwrap();
        sheet.write_number_with_format(1, 1, 45_292.0, &stamp).unwrap();
        sheet.write_string(1, 2, "first").unwrap();
        sheet.write_number_with_format(2, 1, 45_293.0, &stamp).unwrap();
        sheet.write_string(2, 2, "second").unwrap();
        workbook.save(file.path()).unwrap();

        let mut state = AppState::default();
        state.load_path(file.path());

        let ds = state.dataset.as_ref().unwrap();
        assert_eq!(ds.shape(), (2, 3));
        assert_eq!(
            ds.column("day").unwrap().values,
            vec![
                CellValue::Date("2024-01-01".into()),
                CellValue::Date("2024-01-02".into()),
            ]
        );
        assert_eq!(ds.column("x").unwrap().dtype, DType::Float64);
        assert_eq!(
            state.status_label,
            format!("File loaded: {}", file.path().display())
        );

        state.clean();
        assert_eq!(state.dataset.as_ref().unwrap().n_rows(), 1);
        assert_eq!(state.status_label, "Cleaning succeeded: 1 rows removed.");

        state.chart_choice = Some(ChartKind::Boxplot);
        state.visualize();
        assert_eq!(state.figure.as_ref().unwrap().columns, vec!["x"]);
    }

    #[test]
    fn unsupported_file_reports_error_text() {
        let mut state = AppState::default();
        state.load_path(Path::new("notes.txt"));
        assert!(state.dataset.is_none());
        assert_eq!(
            state.status_label,
            "Load failed: unsupported file extension: .txt (expected .csv or .xlsx)"
        );
    }

    #[test]
    fn cleaning_without_dataset_changes_nothing() {
        let mut state = AppState::default();
        state.clean();
        assert_eq!(state.status_label, MSG_NOTHING_TO_CLEAN);
        assert!(state.dataset.is_none());
        assert!(state.figure.is_none());
    }

    #[test]
    fn cleaning_drops_only_incomplete_rows() {
        let (mut state, _file) = loaded("a,b,c\n1,2.5,x\n2,,y\n3,4.5,\n4,5.5,z\n");
        state.clean();

        let ds = state.dataset.as_ref().unwrap();
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(
            ds.column("a").unwrap().values,
            vec![CellValue::Integer(1), CellValue::Integer(4)]
        );
        assert_eq!(
            ds.column("c").unwrap().values,
            vec![CellValue::Text("x".into()), CellValue::Text("z".into())]
        );
        assert_eq!(ds.column("b").unwrap().dtype, DType::Float64);
        assert_eq!(state.status_label, "Cleaning succeeded: 2 rows removed.");
    }

    #[test]
    fn visualize_without_choice_prompts() {
        let (mut state, _file) = loaded("a\n1\n2\n");
        state.visualize();
        assert_eq!(state.status_label, MSG_CHOOSE);
        assert!(state.figure.is_none());
    }

    #[test]
    fn visualize_without_numeric_columns_opens_nothing() {
        let (mut state, _file) = loaded("name,flag\nann,true\nbob,false\n");
        state.chart_choice = Some(ChartKind::Boxplot);
        state.visualize();
        assert_eq!(state.status_label, MSG_NO_NUMERIC);
        assert!(state.figure.is_none());
    }

    #[test]
    fn visualize_after_cleaning_everything_away_opens_nothing() {
        let (mut state, _file) = loaded("a,b\n1,\n,2\n");
        state.clean();
        state.chart_choice = Some(ChartKind::Heatmap);
        state.visualize();
        assert_eq!(state.status_label, MSG_NO_NUMERIC);
        assert!(state.figure.is_none());
    }

    #[test]
    fn visualize_without_dataset_reports_it() {
        let mut state = AppState::default();
        state.chart_choice = Some(ChartKind::Pairplot);
        state.visualize();
        assert_eq!(state.status_label, MSG_NO_DATA);
        assert!(state.figure.is_none());
    }

    #[test]
    fn visualize_builds_figure_over_numeric_columns() {
        let (mut state, _file) = loaded("name,x,y\na,1,2.0\nb,2,4.0\nc,3,5.0\n");
        state.chart_choice = Some(ChartKind::Violinplot);
        state.visualize();

        let figure = state.figure.as_ref().unwrap();
        assert_eq!(figure.kind, ChartKind::Violinplot);
        assert_eq!(figure.columns, vec!["x", "y"]);

        state.close_figure();
        assert!(state.figure.is_none());
    }

    #[test]
    fn flash_expires() {
        let config = AppConfig {
            status_seconds: 1.0,
            ..Default::default()
        };
        let mut state = AppState::new(&config);
        let now = Instant::now();
        state.show_flash("hello".into(), now);
        assert_eq!(state.active_flash(now), Some("hello"));
        assert_eq!(state.active_flash(now + Duration::from_secs(2)), None);
    }

    #[test]
    fn configured_na_tokens_reach_the_loader() {
        let config = AppConfig {
            extra_na_values: vec!["?".into()],
            ..Default::default()
        };
        let file = csv_file("a\n1\n?\n");
        let mut state = AppState::new(&config);
        state.load_path(file.path());
        assert_eq!(
            state.dataset.as_ref().unwrap().column("a").unwrap().dtype,
            DType::Float64
        );
    }
}
