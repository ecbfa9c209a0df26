use crate::component::Component;
use crate::layout_set::LayoutSet;
use crate::page::Page;

/// Visitor pattern for walking layout definitions immutably
///
/// Default implementations walk the whole tree in declared order (direct
/// recursion, so group children come out first-declared first). Override the
/// `visit_*` methods you care about and call the matching `walk_*` to keep
/// descending.
pub trait Visitor<'a>: Sized {
    fn visit_layout_set(&mut self, layout_set: &'a LayoutSet) {
        walk_layout_set(self, layout_set);
    }

    fn visit_page(&mut self, page: &'a Page) {
        walk_page(self, page);
    }

    fn visit_component(&mut self, page: &'a Page, component: &'a Component) {
        walk_component(self, page, component);
    }
}

pub fn walk_layout_set<'a, V: Visitor<'a>>(visitor: &mut V, layout_set: &'a LayoutSet) {
    for page in layout_set.pages() {
        visitor.visit_page(page);
    }
}

pub fn walk_page<'a, V: Visitor<'a>>(visitor: &mut V, page: &'a Page) {
    visitor.visit_component(page, page.root());
}

pub fn walk_component<'a, V: Visitor<'a>>(visitor: &mut V, page: &'a Page, component: &'a Component) {
    for child in page.children(component) {
        visitor.visit_component(page, child);
    }
}
