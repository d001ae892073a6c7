//! カード要素の生成
//!
//! テスティモニアルごとにDOM要素を作成し、コンテナに追加します。
//! ユーザーが入力した文字列は`set_text_content`でのみ設定し、HTMLとしては解釈させません。

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement};

use crate::config::{SiteConfig, WallConfig, WallLayout};
use crate::error::{WallError, WallResult};
use crate::testimonial::Testimonial;

/// カード要素に付けるクラス名
pub const CARD_CLASS: &str = "wall-card";

/// スタイルを一括で設定する
pub(crate) fn set_styles(element: &HtmlElement, styles: &[(&str, &str)]) -> WallResult<()> {
    let style = element.style();
    for (name, value) in styles {
        style.set_property(name, value).map_err(WallError::from_js)?;
    }
    Ok(())
}

fn create_html_element(document: &Document, tag: &str, class: &str) -> WallResult<HtmlElement> {
    let element = document
        .create_element(tag)
        .map_err(WallError::from_js)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| WallError::Dom(format!("<{}> is not an HtmlElement", tag)))?;
    element.set_class_name(class);
    Ok(element)
}

fn append(parent: &Element, child: &Element) -> WallResult<()> {
    parent.append_child(child).map_err(WallError::from_js)?;
    Ok(())
}

/// 1枚のカード要素を作成する
pub fn build_card(
    document: &Document,
    wall_id: &str,
    testimonial: &Testimonial,
    site: &SiteConfig,
    config: &WallConfig,
) -> WallResult<HtmlElement> {
    let card = create_html_element(document, "div", CARD_CLASS)?;
    card.set_id(&testimonial.element_id(wall_id));
    card.set_attribute("data-card-id", &testimonial.id)
        .map_err(WallError::from_js)?;

    let width = format!("{}px", config.card_width);
    let height = format!("{}px", config.card_height);
    let accent = format!("4px solid {}", site.primary_color);
    set_styles(
        &card,
        &[
            ("width", width.as_str()),
            ("height", height.as_str()),
            ("box-sizing", "border-box"),
            ("overflow", "hidden"),
            ("padding", "12px"),
            ("border-radius", "12px"),
            ("background", "#ffffff"),
            ("color", site.text_color.as_str()),
            ("border-top", accent.as_str()),
            ("box-shadow", "0 4px 16px rgba(15, 23, 42, 0.12)"),
        ],
    )?;

    match site.layout {
        WallLayout::Floating => set_styles(
            &card,
            &[
                ("position", "absolute"),
                ("left", "0"),
                ("top", "0"),
                ("will-change", "transform"),
                ("cursor", "grab"),
            ],
        )?,
        WallLayout::Static => set_styles(&card, &[("position", "relative")])?,
    }

    let header = create_html_element(document, "div", "wall-card__header")?;
    set_styles(&header, &[("display", "flex"), ("align-items", "center"), ("gap", "8px")])?;

    if site.show_avatars {
        if let Some(url) = testimonial.author_avatar.as_deref() {
            let avatar = document
                .create_element("img")
                .map_err(WallError::from_js)?
                .dyn_into::<HtmlImageElement>()
                .map_err(|_| WallError::Dom("<img> is not an HtmlImageElement".to_string()))?;
            avatar.set_class_name("wall-card__avatar");
            avatar.set_src(url);
            avatar.set_alt(&testimonial.author_name);
            set_styles(
                &avatar,
                &[("width", "32px"), ("height", "32px"), ("border-radius", "50%"), ("object-fit", "cover")],
            )?;
            append(&header, &avatar)?;
        }
    }

    let byline = create_html_element(document, "div", "wall-card__byline")?;
    let author = create_html_element(document, "div", "wall-card__author")?;
    author.set_text_content(Some(&testimonial.author_name));
    set_styles(&author, &[("font-weight", "600")])?;
    append(&byline, &author)?;

    if site.show_titles {
        if let Some(title) = testimonial.author_title.as_deref() {
            let title_el = create_html_element(document, "div", "wall-card__title")?;
            title_el.set_text_content(Some(title));
            set_styles(&title_el, &[("font-size", "12px"), ("opacity", "0.7")])?;
            append(&byline, &title_el)?;
        }
    }
    append(&header, &byline)?;
    append(&card, &header)?;

    if site.show_ratings {
        if let Some(rating) = testimonial.clamped_rating() {
            let stars = create_html_element(document, "div", "wall-card__rating")?;
            let text: String = "★".repeat(rating as usize) + &"☆".repeat(5 - rating as usize);
            stars.set_text_content(Some(&text));
            stars.set_attribute("aria-label", &format!("{} / 5", rating))
                .map_err(WallError::from_js)?;
            set_styles(&stars, &[("color", site.primary_color.as_str())])?;
            append(&card, &stars)?;
        }
    }

    let content = create_html_element(document, "p", "wall-card__content")?;
    content.set_text_content(Some(&testimonial.text));
    set_styles(&content, &[("margin", "8px 0 0"), ("font-size", "14px"), ("line-height", "1.4")])?;
    append(&card, &content)?;

    Ok(card)
}

/// コンテナを整え、全カードを追加する
pub fn render_cards(
    document: &Document,
    container: &HtmlElement,
    wall_id: &str,
    testimonials: &[Testimonial],
    site: &SiteConfig,
    config: &WallConfig,
) -> WallResult<Vec<HtmlElement>> {
    match site.layout {
        WallLayout::Floating => set_styles(
            container,
            &[
                ("position", "relative"),
                ("overflow", "hidden"),
                ("background", site.background_color.as_str()),
            ],
        )?,
        WallLayout::Static => {
            let columns = format!("repeat(auto-fill, minmax({}px, 1fr))", config.card_width);
            set_styles(
                container,
                &[
                    ("display", "grid"),
                    ("grid-template-columns", columns.as_str()),
                    ("gap", "16px"),
                    ("background", site.background_color.as_str()),
                ],
            )?
        }
    }

    let cards = append_each(container, testimonials, |testimonial| {
        build_card(document, wall_id, testimonial, site, config)
    })?;
    log::debug!("{} 枚のカードを描画しました", cards.len());
    Ok(cards)
}

/// 要素を1つずつ作ってコンテナに追加する
///
/// 途中で失敗した場合は、それまでに追加した要素を取り除いてからエラーを返します。
pub(crate) fn append_each<T, F>(container: &HtmlElement, items: &[T], mut build: F) -> WallResult<Vec<HtmlElement>>
where
    F: FnMut(&T) -> WallResult<HtmlElement>,
{
    let mut appended = Vec::with_capacity(items.len());
    for item in items {
        let result = build(item).and_then(|element| {
            append(container, &element)?;
            Ok(element)
        });
        match result {
            Ok(element) => appended.push(element),
            Err(err) => {
                remove_cards(&appended);
                return Err(err);
            }
        }
    }
    Ok(appended)
}

/// 描画したカードをすべて取り除く
pub fn remove_cards(cards: &[HtmlElement]) {
    for card in cards {
        card.remove();
    }
}
