use crate::analyzers::text::{self, count_content_words};
use crate::dom::HtmlPage;

#[cfg(test)]
mod word_count_tests {
    use super::*;

    #[test]
    fn test_navigation_is_excluded() {
        let page = HtmlPage::parse("<body><nav>Menu</nav><main>Hello world!</main></body>");
        assert_eq!(count_content_words(&page), 2);
    }

    #[test]
    fn test_falls_back_to_body() {
        let page = HtmlPage::parse(
            "<html><body><header>Site name</header><p>One two three</p>\
             <footer>Copyright notice</footer></body></html>",
        );
        assert_eq!(count_content_words(&page), 3);
    }

    #[test]
    fn test_content_selectors_are_tried_in_order() {
        // article outranks the generic .content class even when it comes later
        let page = HtmlPage::parse(
            r#"<html><body><div class="content">a b c d</div><article>x y</article></body></html>"#,
        );
        assert_eq!(count_content_words(&page), 2);
    }

    #[test]
    fn test_boilerplate_inside_main_is_removed() {
        let page = HtmlPage::parse(
            r#"<html><body><main>
                <aside>Related stories</aside>
                <p>Body text</p>
                <div class="ad">Buy now</div>
                <script>document.write("not words")</script>
            </main></body></html>"#,
        );
        assert_eq!(count_content_words(&page), 2);
    }

    #[test]
    fn test_non_latin_scripts_are_counted() {
        let page = HtmlPage::parse(
            "<html><body><main><p>Привет мир</p><p>こんにちは</p><p>Ελληνικά</p></main></body></html>",
        );
        assert_eq!(count_content_words(&page), 4);
    }

    #[test]
    fn test_digits_and_punctuation_are_not_words() {
        let page = HtmlPage::parse("<html><body><main>2024 -- 42! It's e-mail time.</main></body></html>");
        // "Its email time" once digits and punctuation are stripped
        assert_eq!(count_content_words(&page), 3);
    }

    #[test]
    fn test_block_elements_separate_words() {
        let page =
            HtmlPage::parse("<html><body><main><p>first</p><p>second</p><em>th</em>ird</main></body></html>");
        assert_eq!(count_content_words(&page), 3);
    }

    #[test]
    fn test_empty_document_counts_zero() {
        assert_eq!(count_content_words(&HtmlPage::parse("")), 0);
        assert_eq!(
            count_content_words(&HtmlPage::parse("<html><body><nav>Only nav</nav></body></html>")),
            0
        );
    }

    #[test]
    fn test_counting_does_not_change_the_page() {
        let page = HtmlPage::parse("<body><nav>Menu</nav><main>Hello world!</main></body>");
        assert_eq!(count_content_words(&page), count_content_words(&page));
        assert!(text::content_text(&page).unwrap().contains("Hello"));
    }
}

#[cfg(test)]
mod helper_tests {
    use super::*;

    #[test]
    fn test_letters_only() {
        assert_eq!(text::letters_only("Hello,   world! 123"), "Hello world");
        assert_eq!(text::letters_only("  \n\t "), "");
        assert_eq!(text::letters_only("naïve café"), "naïve café");
    }

    #[test]
    fn test_count_words() {
        assert_eq!(text::count_words(""), 0);
        assert_eq!(text::count_words("one"), 1);
        assert_eq!(text::count_words("one, two; three."), 3);
        assert_eq!(text::count_words("日本語 テキスト"), 2);
    }
}
