//! Server-rendered pages.

use axum::response::Html;

use chrono::NaiveDate;

use crate::tasks::format::CANONICAL_DATE;
use crate::tasks::TaskView;

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"ja\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    ))
}

pub fn login_page(error: Option<&str>) -> Html<String> {
    let notice = error
        .map(|e| format!("<p class=\"error\">{}</p>\n", escape(e)))
        .unwrap_or_default();

    page(
        "ログイン",
        &format!(
            r#"<h1>ログイン</h1>
{notice}<form method="post" action="/login">
  <input name="username" placeholder="ユーザー名" required>
  <input name="password" type="password" placeholder="パスワード" required>
  <button type="submit">ログイン</button>
</form>"#
        ),
    )
}

pub fn task_list_page(username: &str, tasks: &[TaskView]) -> Html<String> {
    let mut rows = String::new();
    for task in tasks {
        let class = if task.done { " class=\"done\"" } else { "" };
        let toggle_label = if task.done { "未完了に戻す" } else { "完了" };
        rows.push_str(&format!(
            r#"<tr{class}>
  <td>{description}</td><td>{due}</td><td>{duration}</td><td>{cost}</td>
  <td>
    <form method="post" action="/toggle"><input type="hidden" name="id" value="{id}"><button>{toggle_label}</button></form>
    <a href="/edit?id={id}">編集</a>
    <form method="post" action="/delete"><input type="hidden" name="id" value="{id}"><button>削除</button></form>
  </td>
</tr>
"#,
            id = task.id,
            description = escape(&task.description),
            due = escape(&task.due_formatted),
            duration = escape(&task.duration_label),
            cost = escape(&task.cost_label),
        ));
    }

    page(
        "タスク一覧",
        &format!(
            r#"<header>{user} さん | <a href="/logout">ログアウト</a></header>
<h1>タスク一覧</h1>
<form method="post" action="/add">
  <input name="task" placeholder="タスク" required>
  <input name="due" type="date">
  <input name="duration" type="number" min="0" placeholder="所要時間(分)">
  <input name="cost" type="number" min="0" placeholder="費用(円)">
  <button type="submit">追加</button>
</form>
<table>
<tr><th>タスク</th><th>期限</th><th>所要時間</th><th>費用</th><th></th></tr>
{rows}</table>"#,
            user = escape(username),
        ),
    )
}

fn is_canonical_date(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, CANONICAL_DATE).is_ok()
}

pub fn edit_page(task: &TaskView) -> Html<String> {
    // a date input blanks any value it cannot parse, which would erase the
    // stored due date on save
    let due = &task.due_formatted;
    let due_type = if due.is_empty() || is_canonical_date(due) { "date" } else { "text" };

    page(
        "タスク編集",
        &format!(
            r#"<h1>タスク編集</h1>
<form method="post" action="/update">
  <input type="hidden" name="id" value="{id}">
  <input name="task" value="{description}" required>
  <input name="due" type="{due_type}" value="{due}">
  <input name="duration" type="number" min="0" value="{duration}">
  <input name="cost" type="number" min="0" value="{cost}">
  <button type="submit">保存</button>
</form>
<a href="/">戻る</a>"#,
            id = task.id,
            description = escape(&task.description),
            due = escape(&task.due_formatted),
            duration = task.duration_minutes,
            cost = task.cost,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_task_list_escapes_descriptions() {
        let view = TaskView {
            id: 1,
            description: "<script>".to_string(),
            due: "2025-12-12".to_string(),
            due_formatted: "2025-12-12".to_string(),
            duration_minutes: 15,
            duration_label: "15分以内".to_string(),
            cost: 1001,
            cost_label: "1001円".to_string(),
            done: false,
        };

        let Html(body) = task_list_page("alice", &[view]);
        assert!(body.contains("&lt;script&gt;"));
        assert!(!body.contains("<script>"));
        assert!(body.contains("15分以内"));
        assert!(body.contains("1001円"));
    }

    fn view_due(due: &str) -> TaskView {
        TaskView {
            id: 7,
            description: "legacy".to_string(),
            due: due.to_string(),
            due_formatted: due.to_string(),
            duration_minutes: 0,
            duration_label: "0分".to_string(),
            cost: 0,
            cost_label: "0円".to_string(),
            done: false,
        }
    }

    #[test]
    fn test_edit_page_keeps_free_form_due_editable() {
        let Html(body) = edit_page(&view_due("next friday"));
        assert!(body.contains(r#"name="due" type="text" value="next friday""#));

        let Html(body) = edit_page(&view_due("2025-12-12"));
        assert!(body.contains(r#"name="due" type="date" value="2025-12-12""#));

        let Html(body) = edit_page(&view_due(""));
        assert!(body.contains(r#"name="due" type="date" value="""#));
    }
}
