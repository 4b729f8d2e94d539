use crate::pager::PageLabel::{Gap, Page};
use crate::view::{DateFormat, Notice, PageSize, TerminalView, ViewOptions, PAGE_SIZES};

fn record(id: i64, number: &str) -> crate::api::TerminalRecord {
    crate::api::TerminalRecord {
        terminal_number_id: id,
        number: number.to_string(),
        date_created: "2024-01-15T10:30:00".to_string(),
    }
}

fn catalog(count: usize) -> Vec<crate::api::TerminalRecord> {
    (1..=count)
        .map(|i| record(i as i64, &format!("2033AX{i:03}")))
        .collect()
}

fn view_with(page_size: PageSize) -> TerminalView {
    TerminalView::new(ViewOptions {
        page_size,
        ..ViewOptions::default()
    })
}

#[test]
fn browsing_a_mid_size_catalog_covers_every_record() {
    let mut view = view_with(PageSize::Limited(10));
    view.apply_list(Ok(catalog(47)));
    assert_eq!(
        view.take_notice(),
        Some(Notice::Success("Loaded 47 terminals".to_string()))
    );
    assert_eq!(view.pager().total_pages(), 5);

    let mut seen = 0;
    loop {
        seen += view.visible().len();
        if !view.pager().has_next() {
            break;
        }
        view.next_page();
    }
    assert_eq!(seen, 47);
    assert_eq!(view.visible().len(), 7);
    assert_eq!(view.pager().slice().start, 40);
    assert_eq!(
        view.visible().first().map(|r| r.number.as_str()),
        Some("2033AX041")
    );
}

#[test]
fn deep_catalog_window_keeps_the_ends_reachable() {
    let mut view = view_with(PageSize::Limited(5));
    view.apply_list(Ok(catalog(300)));
    assert_eq!(view.pager().total_pages(), 60);

    view.goto_page(30);
    assert_eq!(
        view.pager().window(),
        vec![Page(1), Gap, Page(29), Page(30), Page(31), Gap, Page(60)]
    );

    view.goto_page(2);
    assert_eq!(
        view.pager().window(),
        vec![Page(1), Page(2), Page(3), Page(4), Gap, Page(60)]
    );

    view.last_page();
    assert_eq!(
        view.pager().window(),
        vec![Page(1), Gap, Page(57), Page(58), Page(59), Page(60)]
    );
}

#[test]
fn a_reload_always_lands_back_on_page_one() {
    let mut view = view_with(PageSize::Limited(10));
    view.apply_list(Ok(catalog(47)));
    let _ = view.take_notice();
    view.goto_page(4);
    assert_eq!(view.pager().current_page(), 4);

    view.apply_list(Ok(catalog(52)));
    assert_eq!(view.pager().current_page(), 1);
    // refreshing an already-populated list raises no notice
    assert_eq!(view.take_notice(), None);
}

#[test]
fn resizing_rows_per_page_lands_back_on_page_one() {
    let mut view = view_with(PageSize::Limited(5));
    view.apply_list(Ok(catalog(47)));
    view.goto_page(7);
    assert_eq!(view.pager().current_page(), 7);

    view.set_page_size(PageSize::Limited(20));
    assert_eq!(view.pager().current_page(), 1);
    assert_eq!(view.pager().total_pages(), 3);

    view.set_page_size(PageSize::All);
    assert_eq!(view.pager().total_pages(), 1);
    assert_eq!(view.visible().len(), 47);
}

#[test]
fn cycling_page_sizes_walks_the_published_steps() {
    let mut view = view_with(PageSize::Limited(5));
    view.apply_list(Ok(catalog(47)));

    let mut sizes = Vec::new();
    for _ in 0..PAGE_SIZES.len() {
        sizes.push(view.cycle_page_size());
    }
    assert_eq!(
        sizes,
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
fn generate_takes_over_the_result_panel() {
    let mut view = view_with(PageSize::Limited(5));
    view.apply_search(Ok(record(7, "2033AXB7")));
    assert!(view.search_result().is_some());

    view.begin_generate();
    view.apply_generate(Ok("2033AXB9".to_string()));
    assert_eq!(
        view.take_notice(),
        Some(Notice::Success(
            "Terminal number generated successfully!".to_string()
        ))
    );
    assert!(view.search_result().is_none());
    assert_eq!(view.generated().map(|g| g.number.as_str()), Some("2033AXB9"));

    view.apply_generate_details(Some(record(9, "2033AXB9")));
    assert!(view.generated().and_then(|g| g.details.as_ref()).is_some());

    // a new search clears the generated panel and normalizes the query
    let query = view.begin_search("  2033axb1 ");
    assert_eq!(query.as_deref(), Some("2033AXB1"));
    assert!(view.generated().is_none());
}

#[test]
fn backend_rejections_surface_their_own_message() {
    let mut view = view_with(PageSize::Limited(5));
    view.apply_search(Err(crate::api::ApiError::Application {
        code: "96".to_string(),
        message: "Terminal not found".to_string(),
    }));
    assert_eq!(
        view.take_notice(),
        Some(Notice::Error("Terminal not found".to_string()))
    );
    assert!(view.search_result().is_none());

    view.apply_generate(Err(crate::api::ApiError::Application {
        code: "99".to_string(),
        message: "  ".to_string(),
    }));
    assert_eq!(
        view.take_notice(),
        Some(Notice::Error(
            "Failed to generate terminal number".to_string()
        ))
    );
}

#[test]
fn connectivity_failures_collapse_to_the_network_notice() {
    let mut view = view_with(PageSize::Limited(5));
    view.apply_list(Ok(catalog(5)));
    let _ = view.take_notice();

    view.apply_list(Err(crate::api::ApiError::MissingData {
        endpoint: "GetAllTerminalNumbers",
    }));
    assert_eq!(
        view.take_notice(),
        Some(Notice::Error(
            "Network error. Unable to load terminals.".to_string()
        ))
    );
    assert!(view.records().is_empty());
    assert_eq!(view.pager().total_pages(), 1);
}

#[test]
fn a_full_page_renders_with_absolute_row_numbers() {
    colored::control::set_override(false);
    let mut view = view_with(PageSize::Limited(10));
    view.apply_list(Ok(catalog(37)));
    view.goto_page(4);

    let slice = view.pager().slice();
    assert_eq!((slice.start, slice.end), (30, 37));

    let table =
        crate::output::render_table(view.visible(), slice.start, DateFormat::DayMonthYear);
    assert!(table.contains("  31     2033AX031"));
    assert!(table.contains("  37     2033AX037"));
    assert!(table.contains("15/01/2024"));

    let bar = crate::output::render_pager(view.pager());
    assert_eq!(bar, "‹ 1 2 3 [4] ›");
}

#[tokio::test]
async fn an_unreachable_service_reports_as_a_connection_problem() {
    let client = crate::api::ApiClient::new(&crate::api::ClientOptions {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_seconds: 2,
        ..crate::api::ClientOptions::default()
    })
    .unwrap();

    let err = client.list_all().await.unwrap_err();
    assert!(!err.is_application());
    assert_eq!(
        err.user_message("Failed to fetch terminals"),
        "Network error. Please check your connection."
    );
}
