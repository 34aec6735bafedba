use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::filename::extension_from_url;
use crate::resolve::{is_http_url, resolve_reference};
use crate::srcset::select_best;
use crate::ImageCandidate;

pub trait ImageExtractor: Send + Sync {
    /// Candidate image URLs in discovery order, without duplicates.
    fn extract(&self, html: &str, base_url: &Url) -> Vec<ImageCandidate>;
}

/// Collects image URLs from `<img>`, `<picture><source>` and image links:
/// - `img[src]` and the widest `img[srcset]` entry
/// - the widest `source[srcset]` entry and `source[src]`
/// - `a[href]` whose resolved path ends in an image extension.
///
/// Only http and https URLs survive.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupImageExtractor;

impl ImageExtractor for MarkupImageExtractor {
    fn extract(&self, html: &str, base_url: &Url) -> Vec<ImageCandidate> {
        let doc = Html::parse_document(html);
        let mut found = CandidateSet::default();

        if let Some(sel) = selector("img") {
            for img in doc.select(&sel) {
                found.add_src(&img, base_url);
                found.add_srcset(&img, base_url);
            }
        }

        if let Some(sel) = selector("source") {
            for source in doc.select(&sel) {
                found.add_srcset(&source, base_url);
                found.add_src(&source, base_url);
            }
        }

        if let Some(sel) = selector("a[href]") {
            for anchor in doc.select(&sel) {
                let resolved = anchor
                    .value()
                    .attr("href")
                    .and_then(|href| resolve_reference(base_url, href));
                if let Some(url) = resolved {
                    if extension_from_url(&url).is_some() {
                        found.push(url);
                    }
                }
            }
        }

        found.into_candidates()
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

#[derive(Default)]
struct CandidateSet {
    seen: HashSet<Url>,
    ordered: Vec<ImageCandidate>,
}

impl CandidateSet {
    fn add_src(&mut self, element: &ElementRef, base_url: &Url) {
        if let Some(url) = element
            .value()
            .attr("src")
            .and_then(|src| resolve_reference(base_url, src))
        {
            self.push(url);
        }
    }

    fn add_srcset(&mut self, element: &ElementRef, base_url: &Url) {
        if let Some(url) = element
            .value()
            .attr("srcset")
            .and_then(select_best)
            .and_then(|best| resolve_reference(base_url, best))
        {
            self.push(url);
        }
    }

    fn push(&mut self, url: Url) {
        if !is_http_url(&url) {
            return;
        }
        if self.seen.insert(url.clone()) {
            self.ordered.push(ImageCandidate { url });
        }
    }

    fn into_candidates(self) -> Vec<ImageCandidate> {
        self.ordered
    }
}
