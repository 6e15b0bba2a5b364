// Live calendar searches.
// Marked with #[ignore]: they need a deployed service with the acceptance dump.

use anyhow::Result;
use chrono::NaiveDate;
use datacollect_acceptance::{data, Role, SuiteFixture};
use datacollect_core::{
    AttributeValue, CalendarDto, CalendarVerifier, SearchRequest, SimpleFilter, VerifyOptions,
};
use pretty_assertions::assert_eq;

async fn search(request: &SearchRequest) -> Result<Vec<CalendarDto>> {
    let suite = SuiteFixture::global().await?;
    let client = suite.scenario()?.client_as(Role::Viewer).await?;
    Ok(client.calendars().search(data::CALENDAR_ID, request).await?)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
#[ignore]
async fn test_search_years() -> Result<()> {
    let actual = search(&SearchRequest::new().filter(SimpleFilter::equal("level", "year"))).await?;

    CalendarVerifier::default()
        .verify(&actual, &data::calendar_years())
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_quarters_of_year() -> Result<()> {
    let request = SearchRequest::new()
        .filter(SimpleFilter::equal("level", "quarter"))
        .filter(SimpleFilter::greater_or_equal("startDate", date(2021, 1, 1)))
        .filter(SimpleFilter::less_or_equal("endDate", date(2021, 12, 31)))
        .order_by("startDate");

    let actual = search(&request).await?;

    CalendarVerifier::new(VerifyOptions::new().ordered())
        .verify(&actual, &data::calendar_quarters_2021())
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_search_period_containing_date() -> Result<()> {
    let day = date(2021, 8, 15);
    let request = SearchRequest::new()
        .filter(SimpleFilter::less_or_equal("startDate", day))
        .filter(SimpleFilter::greater_or_equal("endDate", day));

    let actual = search(&request).await?;

    assert!(actual.iter().all(|period| period.contains(day)));
    let names: Vec<&str> = actual.iter().map(|p| p.name.as_str()).collect();
    assert!(names.contains(&"2021"), "{:?}", names);
    assert!(names.contains(&"3 квартал 2021"), "{:?}", names);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_years_newest_first() -> Result<()> {
    let request = SearchRequest::new()
        .filter(SimpleFilter::equal("level", "year"))
        .order_by_desc("startDate");

    let actual = search(&request).await?;

    let mut expected = data::calendar_years();
    expected.reverse();
    CalendarVerifier::new(VerifyOptions::new().ordered())
        .verify(&actual, &expected)
        .assert();
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_dates_compare_with_midnight_timestamps() -> Result<()> {
    let actual = search(&SearchRequest::new().filter(SimpleFilter::equal("name", "2021"))).await?;

    assert_eq!(actual.len(), 1);
    assert_eq!(
        AttributeValue::date(actual[0].start_date),
        AttributeValue::text("2021-01-01T00:00:00")
    );
    Ok(())
}
