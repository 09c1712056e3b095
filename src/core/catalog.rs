use url::Url;

use crate::model::course::Course;

pub const COURSE_IMAGE_FALLBACK: &str = "/fallback-image.jpg";
pub const AVATAR_FALLBACK: &str = "https://placehold.co/128x128?text=User";

/// 标题包含关键字（不区分大小写）的课程；空关键字保留全部
pub fn filter_by_title<'a>(courses: &'a [Course], term: &str) -> Vec<&'a Course> {
    let term = term.to_lowercase();
    courses
        .iter()
        .filter(|course| course.title.to_lowercase().contains(&term))
        .collect()
}

pub fn in_category(course: &Course, slug: &str) -> bool {
    course.category.as_ref().is_some_and(|c| c.slug == slug)
}

pub fn filter_by_category<'a>(courses: &'a [Course], slug: &str) -> Vec<&'a Course> {
    courses.iter().filter(|course| in_category(course, slug)).collect()
}

/// 搜索关键字去掉首尾空白，空关键字不发请求
pub fn normalize_query(query: &str) -> Option<&str> {
    let query = query.trim();
    (!query.is_empty()).then_some(query)
}

/// `₹` + 印度数字分组（12,34,567），不保留小数；无法解析的价格原样显示
pub fn format_price(price: &str) -> String {
    let Ok(value) = price.trim().parse::<f64>() else {
        return price.to_string();
    };
    if !value.is_finite() {
        return price.to_string();
    }

    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups = Vec::new();
        let mut end = head.len();
        while end > 2 {
            groups.push(&head[end - 2..end]);
            end -= 2;
        }
        groups.push(&head[..end]);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    format!("₹{}{}", if negative { "-" } else { "" }, grouped)
}

/// 后端返回的 `/assets/...` 路径挂在资源主机下，其余地址原样使用，缺省时用 fallback
pub fn resolve_asset_url(base_url: &Url, path: Option<&str>, fallback: &str) -> String {
    match path {
        Some(path) if path.starts_with("/assets") => {
            format!("{}{}", base_url.as_str().trim_end_matches('/'), path)
        }
        Some(path) if !path.is_empty() => path.to_string(),
        _ => fallback.to_string(),
    }
}

/// "Buy Now" 的跳转目标：未登录时先去登录页并带上回跳地址
pub fn buy_now_target(course_id: &str, is_logged_in: bool) -> String {
    if is_logged_in {
        format!("/payment/{}", course_id)
    } else {
        format!("/login?redirect=/payment/{}", course_id)
    }
}
