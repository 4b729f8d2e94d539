const MAX_PLAIN_PAGES: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSlice {
    pub start: usize,
    pub end: usize,
    pub total_pages: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLabel {
    Page(usize),
    Gap,
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    let pages = (total_items + page_size - 1) / page_size;
    pages.max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

pub fn compute_slice(total_items: usize, page_size: usize, current_page: usize) -> PageSlice {
    let page_size = page_size.max(1);
    let pages = total_pages(total_items, page_size);
    let page = clamp_page(current_page, pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    PageSlice {
        start,
        end,
        total_pages: pages,
    }
}

pub fn page_window(current_page: usize, total_pages: usize) -> Vec<PageLabel> {
    let total = total_pages.max(1);
    let current = clamp_page(current_page, total);

    if total <= MAX_PLAIN_PAGES {
        return (1..=total).map(PageLabel::Page).collect();
    }

    let mut labels: Vec<PageLabel> = Vec::new();
    if current <= 3 {
        labels.extend((1..=4).map(PageLabel::Page));
        labels.push(PageLabel::Gap);
        labels.push(PageLabel::Page(total));
    } else if current >= total - 2 {
        labels.push(PageLabel::Page(1));
        labels.push(PageLabel::Gap);
        labels.extend((total - 3..=total).map(PageLabel::Page));
    } else {
        labels.push(PageLabel::Page(1));
        labels.push(PageLabel::Gap);
        labels.extend((current - 1..=current + 1).map(PageLabel::Page));
        labels.push(PageLabel::Gap);
        labels.push(PageLabel::Page(total));
    }
    normalize_window(labels, total)
}

// clamp out-of-range pages, drop duplicates, and collapse gaps that would
// sit next to each other or hide no page at all
fn normalize_window(labels: Vec<PageLabel>, total: usize) -> Vec<PageLabel> {
    let mut out: Vec<PageLabel> = Vec::new();
    for label in labels {
        match label {
            PageLabel::Page(p) => {
                let p = p.clamp(1, total);
                if out.contains(&PageLabel::Page(p)) {
                    continue;
                }
                if matches!(out.last(), Some(PageLabel::Gap)) {
                    let prev = out.iter().rev().find_map(|l| match l {
                        PageLabel::Page(n) => Some(*n),
                        PageLabel::Gap => None,
                    });
                    if prev == Some(p.saturating_sub(1)) {
                        out.pop();
                    }
                }
                out.push(PageLabel::Page(p));
            }
            PageLabel::Gap => {
                if !out.is_empty() && !matches!(out.last(), Some(PageLabel::Gap)) {
                    out.push(PageLabel::Gap);
                }
            }
        }
    }
    while matches!(out.last(), Some(PageLabel::Gap)) {
        out.pop();
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagerState {
    total_items: usize,
    page_size: usize,
    current_page: usize,
}

impl PagerState {
    pub fn new(page_size: usize) -> Self {
        Self {
            total_items: 0,
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page_size)
    }

    // every (re)load lands the pager back on page 1, even when the new
    // total would still fit the old page
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current_page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    pub fn goto(&mut self, page: usize) {
        self.current_page = clamp_page(page, self.total_pages());
    }

    pub fn next(&mut self) {
        self.goto(self.current_page.saturating_add(1));
    }

    pub fn prev(&mut self) {
        self.goto(self.current_page.saturating_sub(1));
    }

    pub fn first(&mut self) {
        self.goto(1);
    }

    pub fn last(&mut self) {
        self.goto(self.total_pages());
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn slice(&self) -> PageSlice {
        compute_slice(self.total_items, self.page_size, self.current_page)
    }

    pub fn window(&self) -> Vec<PageLabel> {
        page_window(self.current_page, self.total_pages())
    }
}
