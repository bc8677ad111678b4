use wetzoek_rag::QueryClassifier;

fn classifier() -> QueryClassifier {
    QueryClassifier::new("7")
}

#[test]
fn explicit_citation_wins() {
    let c = classifier().classify("What does 7:244 BW say about subletting?");
    assert!(c.is_statute_query);
    assert_eq!(c.article_id.as_deref(), Some("7:244"));
}

#[test]
fn citation_with_letter_suffix() {
    let c = classifier().classify("Geldt 7:244a ook voor kamerverhuur?");
    assert!(c.is_statute_query);
    assert_eq!(c.article_id.as_deref(), Some("7:244a"));
}

#[test]
fn general_questions_are_not_statute_queries() {
    let c = classifier().classify("What is the capital of France?");
    assert!(!c.is_statute_query);
    assert_eq!(c.article_id, None);
}

#[test]
fn bare_article_mention_assumes_default_book() {
    let c = classifier().classify("Wat zegt artikel 244 BW over onderhuur?");
    assert!(c.is_statute_query);
    assert_eq!(c.article_id.as_deref(), Some("7:244"));
}

#[test]
fn default_book_is_configurable() {
    let c = QueryClassifier::new("3").classify("Wat zegt artikel 12 van het burgerlijk wetboek?");
    assert!(c.is_statute_query);
    assert_eq!(c.article_id.as_deref(), Some("3:12"));
}

#[test]
fn book_and_article_keywords_without_number() {
    let c = classifier().classify("Welk artikel van het burgerlijk wetboek gaat over huur?");
    assert!(c.is_statute_query);
    assert_eq!(c.article_id, None, "no number to resolve, category filter applies instead");
}

#[test]
fn article_keyword_alone_is_not_enough() {
    let c = classifier().classify("Ik las een artikel in de krant over voetbal.");
    assert!(!c.is_statute_query);
    assert_eq!(c.article_id, None);
}

#[test]
fn english_and_bulgarian_article_words_are_recognized() {
    let en = classifier().classify("What does article 244 of the civil code say?");
    assert!(en.is_statute_query);
    assert_eq!(en.article_id.as_deref(), Some("7:244"));

    let bg = classifier().classify("Какво казва чл. 244 BW?");
    assert!(bg.is_statute_query);
    assert_eq!(bg.article_id.as_deref(), Some("7:244"));
}
