use chrono::NaiveDate;
use healthnlu_core::VariableValue;
use healthnlu_core::time::TimeExtractor;
use healthnlu_core::time::engine::ParseContext;
use rstest::{fixture, rstest};

#[fixture]
fn extractor() -> TimeExtractor {
    TimeExtractor::new().expect("rules compile")
}

fn ctx() -> ParseContext {
    // a Sunday
    ParseContext { reference: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(), data_initial_date: None }
}

fn first(extractor: &TimeExtractor, text: &str) -> VariableValue {
    extractor
        .extract_first(text, &ctx())
        .unwrap_or_else(|| panic!("nothing found in {text:?}"))
        .value
}

#[rstest]
#[case("monday", 20200224)]
#[case("sunday", 20200301)]
#[case("last monday", 20200217)]
#[case("last last monday", 20200210)]
#[case("today", 20200301)]
#[case("yesterday", 20200229)]
#[case("march 5", 20190305)]
#[case("february 10th", 20200210)]
#[case("easter", 20190421)]
#[case("martin luther king day", 20200120)]
#[case("presidents day", 20200217)]
#[case("memorial day", 20190527)]
#[case("labor day", 20190902)]
#[case("thanksgiving", 20191128)]
fn single_days(extractor: TimeExtractor, #[case] text: &str, #[case] expected: u32) {
    assert_eq!(first(&extractor, text), VariableValue::Date(expected), "{text}");
}

#[rstest]
#[case("last month", [20200201, 20200229])]
#[case("last last month", [20200101, 20200131])]
#[case("this week", [20200224, 20200301])]
#[case("last week", [20200217, 20200223])]
#[case("past 10 days", [20200221, 20200301])]
#[case("last seven days", [20200224, 20200301])]
#[case("april", [20190401, 20190430])]
#[case("march", [20200301, 20200331])]
#[case("last march", [20190301, 20190331])]
#[case("spring", [20200301, 20200531])]
#[case("summer", [20190601, 20190831])]
#[case("fall", [20190901, 20191130])]
#[case("autumn", [20190901, 20191130])]
#[case("last summer", [20190601, 20190831])]
#[case("fall of 2018", [20180901, 20181130])]
#[case("2016 summer", [20160601, 20160831])]
#[case("winter", [20191201, 20200229])]
#[case("last winter", [20191201, 20200229])]
#[case("winter 2017", [20171201, 20180228])]
#[case("since february", [20200201, 20200301])]
fn periods(extractor: TimeExtractor, #[case] text: &str, #[case] expected: [u32; 2]) {
    assert_eq!(first(&extractor, text), VariableValue::Period(expected), "{text}");
}

#[rstest]
#[case("from october 10 to january 20", [20191010, 20200120])]
#[case("from february to april", [20200201, 20200430])]
#[case("from november to march", [20191101, 20200331])]
#[case("from sunday to thursday", [20200223, 20200227])]
#[case("from thursday to tuesday", [20200220, 20200225])]
#[case("from last monday to this wednesday", [20200217, 20200226])]
#[case("from 2019 to 2020", [20190101, 20201231])]
fn merged_ranges(extractor: TimeExtractor, #[case] text: &str, #[case] expected: [u32; 2]) {
    let found = extractor.extract(text, &ctx());
    assert_eq!(found.len(), 1, "{text}: {found:?}");
    assert_eq!(found[0].value, VariableValue::Period(expected), "{text}");
}

// Dictation often hears "to" as "two"
#[rstest]
#[case("january 20th 2 february 10th", [20200120, 20200210])]
#[case("january 2 2 february 10th", [20200102, 20200210])]
#[case("december 12th, two december 16th", [20191212, 20191216])]
#[case("from 2012 2020", [20100101, 20201231])]
#[case("1992 2000", [19900101, 20001231])]
fn misheard_connectors(extractor: TimeExtractor, #[case] text: &str, #[case] expected: [u32; 2]) {
    assert_eq!(first(&extractor, text), VariableValue::Period(expected), "{text}");
}

#[rstest]
fn weekdays_never_lie_in_the_future(extractor: TimeExtractor) {
    let today = 20200301;
    for day in ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"] {
        let VariableValue::Date(date) = first(&extractor, day) else {
            panic!("{day} is not a date");
        };
        assert!(date <= today && date > 20200223, "{day}: {date}");
    }
}

#[rstest]
fn stated_year_is_certain(extractor: TimeExtractor) {
    let found = extractor.extract_first("march 5 2018", &ctx()).unwrap();
    assert_eq!(found.value, VariableValue::Date(20180305));
    assert!(found.certain);

    let found = extractor.extract_first("march 5", &ctx()).unwrap();
    assert!(!found.certain);
}

#[rstest]
fn dataset_start_needs_an_initial_date(extractor: TimeExtractor) {
    let with_start = ParseContext {
        data_initial_date: NaiveDate::from_ymd_opt(2019, 6, 1),
        ..ctx()
    };
    let found = extractor.extract_first("over the entire dataset", &with_start).unwrap();
    assert_eq!(found.value, VariableValue::Period([20190601, 20200301]));
    let found = extractor.extract_first("the first day of data", &with_start).unwrap();
    assert_eq!(found.value, VariableValue::Date(20190601));

    assert!(extractor.extract("over the entire dataset", &ctx()).is_empty());
}

#[rstest]
#[case("may i see my steps")]
#[case("may we look at my weight")]
fn modal_may_is_not_a_month(extractor: TimeExtractor, #[case] text: &str) {
    assert!(extractor.extract(text, &ctx()).is_empty(), "{text}");
}

#[rstest]
fn may_after_a_preposition_is_a_month(extractor: TimeExtractor) {
    assert_eq!(first(&extractor, "my steps in may"), VariableValue::Period([20190501, 20190531]));
}
