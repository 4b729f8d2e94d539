use crate::api::{ApiError, TerminalRecord};
use crate::pager::PagerState;

pub const PAGE_SIZES: [PageSize; 5] = [
    PageSize::Limited(5),
    PageSize::Limited(10),
    PageSize::Limited(20),
    PageSize::Limited(50),
    PageSize::All,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSize {
    Limited(usize),
    All,
}

impl PageSize {
    pub fn parse(value: &str) -> Option<PageSize> {
        match value.trim().to_lowercase().as_str() {
            "5" => Some(PageSize::Limited(5)),
            "10" => Some(PageSize::Limited(10)),
            "20" => Some(PageSize::Limited(20)),
            "50" => Some(PageSize::Limited(50)),
            "all" => Some(PageSize::All),
            _ => None,
        }
    }

    pub fn resolve(&self, total_items: usize) -> usize {
        match self {
            PageSize::Limited(n) => (*n).max(1),
            PageSize::All => total_items.max(1),
        }
    }

    pub fn cycle(&self) -> PageSize {
        let idx = PAGE_SIZES.iter().position(|s| s == self).unwrap_or(0);
        PAGE_SIZES[(idx + 1) % PAGE_SIZES.len()]
    }

    pub fn label(&self) -> String {
        match self {
            PageSize::Limited(n) => n.to_string(),
            PageSize::All => "all".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    Table,
    Grid,
}

impl Layout {
    pub fn parse(value: &str) -> Option<Layout> {
        match value.trim().to_lowercase().as_str() {
            "table" => Some(Layout::Table),
            "grid" => Some(Layout::Grid),
            _ => None,
        }
    }

    pub fn toggle(&self) -> Layout {
        match self {
            Layout::Table => Layout::Grid,
            Layout::Grid => Layout::Table,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Layout::Table => "table",
            Layout::Grid => "grid",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateFormat {
    DayMonthYear,
    MonthDayYear,
    Iso,
}

impl DateFormat {
    pub fn parse(value: &str) -> Option<DateFormat> {
        match value.trim().to_lowercase().as_str() {
            "dmy" => Some(DateFormat::DayMonthYear),
            "mdy" => Some(DateFormat::MonthDayYear),
            "iso" => Some(DateFormat::Iso),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "dmy",
            DateFormat::MonthDayYear => "mdy",
            DateFormat::Iso => "iso",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Clone, Debug)]
pub struct ViewOptions {
    pub page_size: PageSize,
    pub layout: Layout,
    pub date_format: DateFormat,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::Limited(5),
            layout: Layout::Table,
            date_format: DateFormat::DayMonthYear,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Generated {
    pub number: String,
    pub details: Option<TerminalRecord>,
}

#[derive(Clone, Debug)]
pub struct TerminalView {
    records: Vec<TerminalRecord>,
    generated: Option<Generated>,
    search_result: Option<TerminalRecord>,
    notice: Option<Notice>,
    pager: PagerState,
    options: ViewOptions,
}

impl TerminalView {
    pub fn new(options: ViewOptions) -> Self {
        let pager = PagerState::new(options.page_size.resolve(0));
        Self {
            records: Vec::new(),
            generated: None,
            search_result: None,
            notice: None,
            pager,
            options,
        }
    }

    pub fn records(&self) -> &[TerminalRecord] {
        &self.records
    }

    pub fn generated(&self) -> Option<&Generated> {
        self.generated.as_ref()
    }

    pub fn search_result(&self) -> Option<&TerminalRecord> {
        self.search_result.as_ref()
    }

    pub fn pager(&self) -> &PagerState {
        &self.pager
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn visible(&self) -> &[TerminalRecord] {
        let slice = self.pager.slice();
        &self.records[slice.start..slice.end]
    }

    pub fn begin_generate(&mut self) {
        self.generated = None;
        self.search_result = None;
    }

    pub fn apply_generate(&mut self, result: Result<String, ApiError>) {
        match result {
            Ok(number) => {
                self.generated = Some(Generated {
                    number,
                    details: None,
                });
                self.notice = Some(Notice::Success(
                    "Terminal number generated successfully!".to_string(),
                ));
            }
            Err(err) => {
                self.notice = Some(Notice::Error(failure_message(
                    &err,
                    "Failed to generate terminal number",
                    "Network error. Please check your connection.",
                )));
            }
        }
    }

    // a failed detail lookup after a successful generate stays silent;
    // the code itself is already on screen
    pub fn apply_generate_details(&mut self, details: Option<TerminalRecord>) {
        if let Some(generated) = self.generated.as_mut() {
            generated.details = details;
        }
    }

    // returns the normalized query, or None when the input is rejected
    // before any request is made
    pub fn begin_search(&mut self, input: &str) -> Option<String> {
        let query = input.trim().to_uppercase();
        if query.is_empty() {
            self.notice = Some(Notice::Error("Please enter a terminal number".to_string()));
            return None;
        }
        self.search_result = None;
        self.generated = None;
        Some(query)
    }

    pub fn apply_search(&mut self, result: Result<TerminalRecord, ApiError>) {
        match result {
            Ok(record) => {
                self.search_result = Some(record);
                self.notice = Some(Notice::Success("Terminal found!".to_string()));
            }
            Err(err) => {
                self.notice = Some(Notice::Error(failure_message(
                    &err,
                    "Terminal not found",
                    "Network error. Please check your connection.",
                )));
            }
        }
    }

    pub fn apply_list(&mut self, result: Result<Vec<TerminalRecord>, ApiError>) {
        match result {
            Ok(records) => {
                let first_population = self.records.is_empty() && !records.is_empty();
                self.records = records;
                self.reload_pager();
                if first_population {
                    self.notice = Some(Notice::Success(format!(
                        "Loaded {} terminals",
                        self.records.len()
                    )));
                }
            }
            Err(err) => {
                self.records.clear();
                self.reload_pager();
                self.notice = Some(Notice::Error(failure_message(
                    &err,
                    "Failed to fetch terminals",
                    "Network error. Unable to load terminals.",
                )));
            }
        }
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.options.page_size = size;
        self.pager.set_page_size(size.resolve(self.records.len()));
    }

    pub fn cycle_page_size(&mut self) -> PageSize {
        let next = self.options.page_size.cycle();
        self.set_page_size(next);
        next
    }

    pub fn toggle_layout(&mut self) -> Layout {
        self.options.layout = self.options.layout.toggle();
        self.options.layout
    }

    pub fn goto_page(&mut self, page: usize) {
        self.pager.goto(page);
    }

    pub fn next_page(&mut self) {
        self.pager.next();
    }

    pub fn prev_page(&mut self) {
        self.pager.prev();
    }

    pub fn first_page(&mut self) {
        self.pager.first();
    }

    pub fn last_page(&mut self) {
        self.pager.last();
    }

    fn reload_pager(&mut self) {
        self.pager
            .set_page_size(self.options.page_size.resolve(self.records.len()));
        self.pager.set_total_items(self.records.len());
    }
}

fn failure_message(err: &ApiError, fallback: &str, network: &str) -> String {
    if err.is_application() {
        err.user_message(fallback)
    } else {
        network.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Envelope;

    fn record(id: i64, number: &str) -> TerminalRecord {
        TerminalRecord {
            terminal_number_id: id,
            number: number.to_string(),
            date_created: "2024-01-15T10:30:00".to_string(),
        }
    }

    fn records(n: usize) -> Vec<TerminalRecord> {
        (0..n)
            .map(|i| record(i as i64, &format!("2033AXB{i}")))
            .collect()
    }

    fn application(message: &str) -> ApiError {
        ApiError::Application {
            code: "99".to_string(),
            message: message.to_string(),
        }
    }

    fn transport() -> ApiError {
        let source = serde_json::from_str::<Envelope<String>>("<html>").unwrap_err();
        ApiError::Decode {
            endpoint: "GetAllTerminalNumbers",
            source,
        }
    }

    #[test]
    fn page_size_parses_only_the_allowed_set() {
        assert_eq!(PageSize::parse("5"), Some(PageSize::Limited(5)));
        assert_eq!(PageSize::parse("50"), Some(PageSize::Limited(50)));
        assert_eq!(PageSize::parse("ALL"), Some(PageSize::All));
        assert_eq!(PageSize::parse("25"), None);
        assert_eq!(PageSize::parse("0"), None);
        assert_eq!(PageSize::parse(""), None);
    }

    #[test]
    fn page_size_cycle_wraps_through_the_selector_order() {
        let mut size = PageSize::Limited(5);
        let mut seen = Vec::new();
        for _ in 0..5 {
            size = size.cycle();
            seen.push(size);
        }
        assert_eq!(
            seen,
            vec![
                PageSize::Limited(10),
                PageSize::Limited(20),
                PageSize::Limited(50),
                PageSize::All,
                PageSize::Limited(5),
            ]
        );
    }

    #[test]
    fn page_size_all_resolves_to_the_whole_list() {
        assert_eq!(PageSize::All.resolve(300), 300);
        assert_eq!(PageSize::All.resolve(0), 1);
        assert_eq!(PageSize::Limited(20).resolve(300), 20);
    }

    #[test]
    fn list_load_resets_to_first_page() {
        let mut view = TerminalView::new(ViewOptions::default());
        view.apply_list(Ok(records(47)));
        view.goto_page(4);
        assert_eq!(view.pager().current_page(), 4);

        view.apply_list(Ok(records(47)));
        assert_eq!(view.pager().current_page(), 1);
    }

    #[test]
    fn first_population_emits_a_loaded_notice_only_once() {
        let mut view = TerminalView::new(ViewOptions::default());
        view.apply_list(Ok(records(12)));
        assert_eq!(
            view.take_notice(),
            Some(Notice::Success("Loaded 12 terminals".to_string()))
        );

        view.apply_list(Ok(records(13)));
        assert_eq!(view.take_notice(), None);
    }

    #[test]
    fn empty_reload_emits_no_notice() {
        let mut view = TerminalView::new(ViewOptions::default());
        view.apply_list(Ok(Vec::new()));
        assert_eq!(view.take_notice(), None);
    }

    #[test]
    fn failed_list_load_clears_records_and_surfaces_the_payload_message() {
        let mut view = TerminalView::new(ViewOptions::default());
        view.apply_list(Ok(records(10)));
        view.take_notice();

        view.apply_list(Err(application("Service unavailable")));
        assert!(view.records().is_empty());
        assert_eq!(view.pager().current_page(), 1);
        assert_eq!(
            view.take_notice(),
            Some(Notice::Error("Service unavailable".to_string()))
        );
    }

    #[test]
    fn failed_list_load_over_transport_shows_its_own_network_notice() {
        let mut view = TerminalView::new(ViewOptions::default());
        view.apply_list(Err(transport()));
        assert_eq!(
            view.take_notice(),
            Some(Notice::Error(
                "Network error. Unable to load terminals.".to_string()
            ))
        );
    }

    #[test]
    fn blank_search_is_rejected_before_any_request() {
        let mut view = TerminalView::new(ViewOptions::default());
        assert_eq!(view.begin_search("   "), None);
        assert_eq!(
            view.take_notice(),
            Some(Notice::Error("Please enter a terminal number".to_string()))
        );
    }

    #[test]
    fn search_input_is_trimmed_and_uppercased() {
        let mut view = TerminalView::new(ViewOptions::default());
        assert_eq!(view.begin_search("  2033axb1 "), Some("2033AXB1".to_string()));
    }

    #[test]
    fn search_clears_the_generated_panel() {
        let mut view = TerminalView::new(ViewOptions::default());
        view.begin_generate();
        view.apply_generate(Ok("2033AXB9".to_string()));
        assert!(view.generated().is_some());

        view.begin_search("2033AXB1");
        assert!(view.generated().is_none());

        view.apply_search(Ok(record(1, "2033AXB1")));
        assert_eq!(view.search_result().unwrap().number, "2033AXB1");
        assert_eq!(
            view.take_notice(),
            Some(Notice::Success("Terminal found!".to_string()))
        );
    }

    #[test]
    fn generate_clears_stale_panels_and_attaches_details() {
        let mut view = TerminalView::new(ViewOptions::default());
        view.apply_search(Ok(record(1, "2033AXB1")));
        view.take_notice();

        view.begin_generate();
        assert!(view.search_result().is_none());

        view.apply_generate(Ok("2033AXB9".to_string()));
        assert_eq!(view.generated().unwrap().number, "2033AXB9");
        assert!(view.generated().unwrap().details.is_none());

        view.apply_generate_details(Some(record(9, "2033AXB9")));
        assert_eq!(
            view.generated().unwrap().details.as_ref().unwrap().number,
            "2033AXB9"
        );
    }

    #[test]
    fn failed_generate_uses_fallback_when_the_payload_has_no_message() {
        let mut view = TerminalView::new(ViewOptions::default());
        view.begin_generate();
        view.apply_generate(Err(application("")));
        assert_eq!(
            view.take_notice(),
            Some(Notice::Error(
                "Failed to generate terminal number".to_string()
            ))
        );
    }

    #[test]
    fn page_size_change_resets_to_first_page() {
        let mut view = TerminalView::new(ViewOptions::default());
        view.apply_list(Ok(records(300)));
        view.goto_page(30);

        view.set_page_size(PageSize::Limited(50));
        assert_eq!(view.pager().current_page(), 1);
        assert_eq!(view.pager().total_pages(), 6);
    }

    #[test]
    fn page_size_all_collapses_to_a_single_page() {
        let mut view = TerminalView::new(ViewOptions::default());
        view.apply_list(Ok(records(300)));
        view.set_page_size(PageSize::All);
        assert_eq!(view.pager().total_pages(), 1);
        assert_eq!(view.visible().len(), 300);
    }

    #[test]
    fn visible_returns_the_current_page_slice() {
        let mut view = TerminalView::new(ViewOptions::default());
        view.apply_list(Ok(records(12)));
        assert_eq!(view.visible().len(), 5);
        assert_eq!(view.visible()[0].number, "2033AXB0");

        view.goto_page(3);
        assert_eq!(view.visible().len(), 2);
        assert_eq!(view.visible()[0].number, "2033AXB10");
    }

    #[test]
    fn layout_toggle_alternates() {
        let mut view = TerminalView::new(ViewOptions::default());
        assert_eq!(view.toggle_layout(), Layout::Grid);
        assert_eq!(view.toggle_layout(), Layout::Table);
    }
}
