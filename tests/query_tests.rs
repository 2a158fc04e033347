use rustyhtml::parallel::{parse_many, select_many};
use rustyhtml::{Document, Error, NodeId, NodeIndex, ParseOptions, SelectorCache, SelectorList};

const PAGE: &[u8] = b"<!DOCTYPE html>\
<html lang=\"en\">\
<head><title>Shop</title><meta charset=\"utf-8\"></head>\
<body>\
<nav id=\"menu\" class=\"bar top\"><a href=\"/\" class=\"home\">Home</a><a href=\"/cart\" rel=\"nofollow\">Cart</a></nav>\
<main id=\"content\">\
<article class=\"item sale\" data-sku=\"A-1\"><h2>Lamp</h2><p class=\"price\">10</p></article>\
<article class=\"item\" data-sku=\"B-2\"><h2>Desk</h2><p class=\"price\">90</p></article>\
<article class=\"item sale\" data-sku=\"C-3\"><h2>Chair</h2></article>\
</main>\
<script>var x = \"<p>\";</script>\
</body>\
</html>";

fn with_page<R>(f: impl FnOnce(&Document<'_>) -> R) -> R {
    let mut buf = PAGE.to_vec();
    let doc = Document::parse(&mut buf, ParseOptions::default()).unwrap();
    f(&doc)
}

fn texts(doc: &Document<'_>, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|&id| String::from_utf8_lossy(doc.value(id)).into_owned())
        .collect()
}

fn skus(doc: &Document<'_>, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|&id| String::from_utf8_lossy(doc.attribute(id, "data-sku").unwrap_or_default()).into_owned())
        .collect()
}

#[test]
fn test_index_lookups() {
    with_page(|doc| {
        let index = NodeIndex::build(doc);

        let menu = index.by_id("menu").unwrap();
        assert_eq!(doc.name(menu), b"nav");
        assert_eq!(index.by_id("missing"), None);

        let sale = index.by_class("sale");
        assert_eq!(skus(doc, &sale), vec!["A-1", "C-3"]);
        assert_eq!(index.by_class("item").len(), 3);

        assert_eq!(index.by_type("article").len(), 3);
        assert_eq!(index.by_type("h2").len(), 3);
        assert_eq!(index.by_type("script").len(), 1);

        assert_eq!(index.by_attribute("href").len(), 2);
        assert_eq!(index.by_attribute_value("rel", "nofollow").len(), 1);
        let b2 = index.by_attribute_value("data-sku", "B-2");
        assert_eq!(b2.len(), 1);
        assert!(doc.contains_class(b2[0], "item"));

        let mut ids: Vec<_> = index.ids().map(|(k, _)| k.to_vec()).collect();
        ids.sort();
        assert_eq!(ids, vec![b"content".to_vec(), b"menu".to_vec()]);
        assert!(index.class_names().any(|c| c == b"price"));
    });
}

#[test]
fn test_index_must_be_rebuilt_after_edits() {
    let mut buf = b"<div><p id=\"a\"></p></div>".to_vec();
    let mut doc = Document::parse(&mut buf, ParseOptions::default()).unwrap();
    let div = doc.root_element().unwrap();
    let p = doc.children(div)[0];

    assert_eq!(NodeIndex::build(&doc).by_id("a"), Some(p));

    doc.remove_child(div, p).unwrap();
    assert_eq!(NodeIndex::build(&doc).by_id("a"), None);
}

#[test]
fn test_select_basic() {
    with_page(|doc| {
        assert_eq!(doc.select("article").unwrap().len(), 3);
        assert_eq!(texts(doc, &doc.select("h2").unwrap()), vec!["Lamp", "Desk", "Chair"]);
        assert_eq!(texts(doc, &doc.select(".price").unwrap()), vec!["10", "90"]);
        assert_eq!(texts(doc, &doc.select("#menu > a").unwrap()), vec!["Home", "Cart"]);
        assert_eq!(texts(doc, &doc.select("ARTICLE.sale h2").unwrap()), vec!["Lamp", "Chair"]);
        assert_eq!(texts(doc, &doc.select("title, .home").unwrap()), vec!["Shop", "Home"]);
        assert!(doc.select("p p").unwrap().is_empty());
    });
}

#[test]
fn test_select_combinators() {
    with_page(|doc| {
        assert_eq!(texts(doc, &doc.select("h2 + p").unwrap()), vec!["10", "90"]);
        assert_eq!(skus(doc, &doc.select("article.sale ~ article").unwrap()), vec!["B-2", "C-3"]);
        assert_eq!(skus(doc, &doc.select("article + article.sale").unwrap()), vec!["C-3"]);
        assert_eq!(doc.select("main > h2").unwrap().len(), 0);
        assert_eq!(doc.select("main h2").unwrap().len(), 3);
        assert!(doc.select("nav || a").unwrap().is_empty());
    });
}

#[test]
fn test_select_attributes() {
    with_page(|doc| {
        assert_eq!(doc.select("[href]").unwrap().len(), 2);
        assert_eq!(texts(doc, &doc.select("a[href=\"/cart\"]").unwrap()), vec!["Cart"]);
        assert_eq!(skus(doc, &doc.select("[data-sku^=C]").unwrap()), vec!["C-3"]);
        assert_eq!(skus(doc, &doc.select("[data-sku$='-2']").unwrap()), vec!["B-2"]);
        assert_eq!(skus(doc, &doc.select("[data-sku*=\"-\"]").unwrap()).len(), 3);
        assert_eq!(skus(doc, &doc.select("[data-sku|=a i]").unwrap()), vec!["A-1"]);
        assert_eq!(skus(doc, &doc.select("[class~=sale]").unwrap()), vec!["A-1", "C-3"]);
        assert_eq!(doc.select("[class=\"item sale\"]").unwrap().len(), 2);
    });
}

#[test]
fn test_select_pseudo_classes() {
    with_page(|doc| {
        assert_eq!(doc.select(":root").unwrap(), doc.select("html").unwrap());
        assert_eq!(skus(doc, &doc.select("article:first-child").unwrap()), vec!["A-1"]);
        assert_eq!(skus(doc, &doc.select("article:last-child").unwrap()), vec!["C-3"]);
        assert_eq!(skus(doc, &doc.select("article:not(.sale)").unwrap()), vec!["B-2"]);
        assert_eq!(skus(doc, &doc.select("article:has(> p)").unwrap()), vec!["A-1", "B-2"]);
        assert_eq!(skus(doc, &doc.select("article:is(.sale, [data-sku=B-2])").unwrap()).len(), 3);
        assert_eq!(doc.select("meta:empty").unwrap().len(), 1);
        assert!(doc.select("a:hover").unwrap().is_empty());
        assert!(doc.select("p::before").unwrap().is_empty());
    });
}

#[test]
fn test_script_content_is_not_selectable() {
    with_page(|doc| {
        let script = doc.select_first("script").unwrap().unwrap();
        assert_eq!(doc.value(script), b"var x = \"<p>\";");
        assert_eq!(doc.select("script p").unwrap().len(), 0);
    });
}

#[test]
fn test_selector_errors() {
    with_page(|doc| {
        for bad in ["", "  ", "div >", "a,", "[href", ":not(a", ":bogus(a)", "a)", "[x='y]"] {
            match doc.select(bad) {
                Err(Error::Selector { .. }) => {}
                other => panic!("{bad:?} should be rejected, got {other:?}"),
            }
        }
    });
}

#[test]
fn test_selector_list_reuse() {
    let list = SelectorList::parse("li.on").unwrap();
    let mut a = b"<ul><li class=\"on\">1</li><li>2</li></ul>".to_vec();
    let mut b = b"<ol><li>3</li><li class=\"on\">4</li></ol>".to_vec();
    let doc_a = Document::parse(&mut a, ParseOptions::default()).unwrap();
    let doc_b = Document::parse(&mut b, ParseOptions::default()).unwrap();
    assert_eq!(texts(&doc_a, &list.select(&doc_a)), vec!["1"]);
    assert_eq!(texts(&doc_b, &list.select(&doc_b)), vec!["4"]);
}

#[test]
fn test_selector_cache() {
    with_page(|doc| {
        let mut cache = SelectorCache::new(2);
        assert!(cache.is_empty());
        assert_eq!(cache.select(doc, "h2").unwrap().len(), 3);
        assert_eq!(cache.select(doc, "h2").unwrap().len(), 3);
        assert_eq!(cache.len(), 1);
        cache.select(doc, "p").unwrap();
        cache.select(doc, "a").unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.select(doc, "a >").is_err());
        assert_eq!(cache.len(), 2);
    });
}

#[test]
fn test_parallel_parse_and_select() {
    let mut buffers: Vec<Vec<u8>> = (0..8)
        .map(|i| format!("<ul>{}</ul>", "<li>x</li>".repeat(i)).into_bytes())
        .collect();
    buffers.push(b"<ul>".to_vec());

    let docs = parse_many(&mut buffers, &ParseOptions::default());
    assert_eq!(docs.len(), 9);
    for (i, doc) in docs.iter().take(8).enumerate() {
        let doc = doc.as_ref().unwrap();
        assert_eq!(doc.select("li").unwrap().len(), i);
    }
    assert!(docs[8].is_err());

    with_page(|doc| {
        let results = select_many(doc, &["article", "h2 + p", "div >"]);
        assert_eq!(results[0].as_ref().unwrap().len(), 3);
        assert_eq!(results[1].as_ref().unwrap().len(), 2);
        assert!(results[2].is_err());
    });
}
