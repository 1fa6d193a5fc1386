use chrono::{DateTime, Local, Timelike, Utc};

/// Relative time in the wording used by the notification list.
pub fn time_ago(input_time: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let duration = now.signed_duration_since(input_time);
  if duration.num_seconds() < 60 {
    "刚刚".to_string()
  } else if duration.num_minutes() < 60 {
    format!("{}分钟前", duration.num_minutes())
  } else if duration.num_hours() < 24 {
    format!("{}小时前", duration.num_hours())
  } else if duration.num_days() == 1 {
    "昨天".to_string()
  } else {
    format!("{}天前", duration.num_days())
  }
}

/// Greeting for the home header, based on the local hour.
pub fn greeting(now: DateTime<Local>) -> &'static str {
  match now.hour() {
    5..=11 => "上午好",
    12..=17 => "下午好",
    _ => "晚上好",
  }
}

pub fn percentage_bar(value: u8, width: usize) -> String {
  let filled = (usize::from(value.min(100)) * width + 50) / 100;
  format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};

  use super::*;

  #[test]
  fn relative_times() {
    let now = Utc::now();
    assert_eq!(time_ago(now - Duration::seconds(5), now), "刚刚");
    assert_eq!(time_ago(now - Duration::minutes(10), now), "10分钟前");
    assert_eq!(time_ago(now - Duration::hours(3), now), "3小时前");
    assert_eq!(time_ago(now - Duration::hours(30), now), "昨天");
    assert_eq!(time_ago(now - Duration::days(4), now), "4天前");
  }

  #[test]
  fn greeting_follows_the_clock() {
    let afternoon = Local.with_ymd_and_hms(2024, 5, 1, 15, 0, 0).unwrap();
    assert_eq!(greeting(afternoon), "下午好");
  }

  #[test]
  fn bar_is_proportional() {
    assert_eq!(percentage_bar(80, 10), "████████░░");
    assert_eq!(percentage_bar(0, 4), "░░░░");
    assert_eq!(percentage_bar(255, 4), "████");
  }
}
