// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Datelike, NaiveDate, Utc};

/// 省级行政区代码
static PROVINCE_CODES: &[u32] = &[
    11, 12, 13, 14, 15, 21, 22, 23, 31, 32, 33, 34, 35, 36, 37, 41, 42, 43, 44, 45, 46,
    50, 51, 52, 53, 54, 61, 62, 63, 64, 65, 71, 81, 82,
];

/// 前 17 位的加权因子
const WEIGHTS: [u32; 17] = [7, 9, 10, 5, 8, 4, 2, 1, 6, 3, 7, 9, 10, 5, 8, 4, 2];

/// 加权和模 11 对应的校验码
const CHECK_CODES: [char; 11] = ['1', '0', 'X', '9', '8', '7', '6', '5', '4', '3', '2'];

/// 身份证号是否有效
///
/// 仅接受 18 位：省份代码、出生日期与校验码全部通过才算有效。
pub fn is_valid_id_card(id: &str) -> bool {
    let id = id.trim();
    let chars: Vec<char> = id.chars().collect();
    if chars.len() != 18 {
        return false;
    }
    if !chars[..17].iter().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let last = chars[17].to_ascii_uppercase();
    if !last.is_ascii_digit() && last != 'X' {
        return false;
    }

    let province = chars[..2]
        .iter()
        .collect::<String>()
        .parse::<u32>()
        .unwrap_or(0);
    if !PROVINCE_CODES.contains(&province) {
        return false;
    }

    if !is_valid_birth_date(&chars[6..14]) {
        return false;
    }

    let sum: u32 = chars[..17]
        .iter()
        .zip(WEIGHTS)
        .map(|(c, weight)| c.to_digit(10).unwrap_or(0) * weight)
        .sum();
    CHECK_CODES[(sum % 11) as usize] == last
}

/// 出生日期字段（YYYYMMDD）是否为 1900 年至今的真实日期
fn is_valid_birth_date(digits: &[char]) -> bool {
    let field: String = digits.iter().collect();
    let year = match field[..4].parse::<i32>() {
        Ok(y) => y,
        Err(_) => return false,
    };
    let month = match field[4..6].parse::<u32>() {
        Ok(m) => m,
        Err(_) => return false,
    };
    let day = match field[6..8].parse::<u32>() {
        Ok(d) => d,
        Err(_) => return false,
    };
    if year < 1900 || year > Utc::now().year() {
        return false;
    }
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

/// 过滤身份证号列表
pub fn filter_id_cards<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .filter(|id| is_valid_id_card(id))
        .map(|id| id.trim().to_string())
        .collect()
}
