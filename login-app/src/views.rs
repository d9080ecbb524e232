use crate::{models::User, session::Flash};

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        content
    )
}

pub fn login(errors: &[String], flash: &Flash, email: &str) -> String {
    let mut content = String::from("<h1>Sign in</h1>\n");

    if let Some(success) = flash.get("success") {
        content.push_str(&format!("<p class=\"success\">{}</p>\n", escape(success)));
    }
    for error in errors {
        content.push_str(&format!("<p class=\"error\">{}</p>\n", escape(error)));
    }

    content.push_str(&format!(
        "<form action=\"/login\" method=\"POST\">\n\
         <input type=\"email\" name=\"email\" placeholder=\"Email\" value=\"{}\">\n\
         <input type=\"password\" name=\"password\" placeholder=\"Password\">\n\
         <button type=\"submit\">Login</button>\n\
         </form>",
        escape(email)
    ));

    page("Sign in", &content)
}

pub fn index(user: &User) -> String {
    page(
        "Welcome",
        &format!(
            "<h1>Welcome {}</h1>\n<p>{}</p>\n<a href=\"/logout\">Logout</a>",
            escape(&user.name),
            escape(&user.email)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_posts_to_login() {
        let html = login(&[], &Flash::new(), "");

        assert!(html.contains("action=\"/login\""));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn login_page_escapes_what_it_echoes() {
        let html = login(
            &[String::from("Invalid <email>")],
            &Flash::new().with("success", "Bye & see you"),
            "\"><script>",
        );

        assert!(html.contains("Invalid &lt;email&gt;"));
        assert!(html.contains("Bye &amp; see you"));
        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
    }
}
