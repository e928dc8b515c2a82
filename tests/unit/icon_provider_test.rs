//! Unit tests for toolbar icon loading.

use std::cell::RefCell;

use tabshell::services::icon_provider::{Icon, IconProvider, Rasterizer, SvgDataUri, DEFAULT_ICON_SIZE};
use tabshell::types::errors::IconError;

/// Rasterizer that fails for one icon source and records requested sizes.
struct Flaky {
    broken: &'static str,
    sizes: RefCell<Vec<u32>>,
}

impl Rasterizer for Flaky {
    fn rasterize(&self, svg: &str, size: u32) -> Result<String, IconError> {
        self.sizes.borrow_mut().push(size);
        if svg == self.broken {
            Err(IconError::Rasterization("corrupt resource".to_string()))
        } else {
            Ok(format!("bitmap:{}", svg.len()))
        }
    }
}

#[test]
fn test_default_provider_loads_every_icon() {
    let icons = IconProvider::default().load_all();
    assert_eq!(icons.len(), Icon::ALL.len());
    for handle in &icons {
        assert!(!handle.placeholder, "{:?}", handle.icon);
        assert!(handle.image.starts_with("data:image/svg+xml;base64,"));
        assert_eq!(handle.size, DEFAULT_ICON_SIZE);
    }
}

#[test]
fn test_icon_names_are_unique() {
    let mut names: Vec<&str> = Icon::ALL.iter().map(|icon| icon.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), Icon::ALL.len());
}

#[test]
fn test_failed_icon_falls_back_to_placeholder() {
    let provider = IconProvider::new(Flaky {
        broken: Icon::Shield.svg(),
        sizes: RefCell::new(Vec::new()),
    });
    let shield = provider.load(Icon::Shield);
    assert!(shield.placeholder);
    assert!(shield.image.starts_with("data:image/svg+xml;base64,"));

    let home = provider.load(Icon::Home);
    assert!(!home.placeholder);
    assert!(home.image.starts_with("bitmap:"));
}

#[test]
fn test_one_failure_does_not_stop_the_rest() {
    let provider = IconProvider::new(Flaky {
        broken: Icon::Back.svg(),
        sizes: RefCell::new(Vec::new()),
    });
    let icons = provider.load_all();
    let placeholders: Vec<Icon> = icons.iter().filter(|h| h.placeholder).map(|h| h.icon).collect();
    assert_eq!(placeholders, vec![Icon::Back]);
}

#[test]
fn test_with_size_is_passed_to_rasterizer() {
    let provider = IconProvider::new(Flaky { broken: "", sizes: RefCell::new(Vec::new()) }).with_size(24);
    let handle = provider.load(Icon::Reload);
    assert_eq!(handle.size, 24);
}

#[test]
fn test_svg_data_uri_rejects_non_svg() {
    assert!(SvgDataUri.rasterize("<png/>", 16).is_err());
    assert!(SvgDataUri.rasterize(Icon::App.svg(), 16).is_ok());
}
