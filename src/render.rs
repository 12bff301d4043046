use crate::model::{StudentRecord, Subject};
use serde::Serialize;
use std::fmt::Write;

/// Named pages. Names match the routes' historical template names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Index,
    Menu,
    StudentList,
    Success,
    Error,
    TopCStudents,
    MeritList,
    GraceMarksForm,
    SearchForm,
    SearchResults,
    TopStudentsForm,
    TopStudentsResults,
}

impl View {
    pub fn name(self) -> &'static str {
        match self {
            View::Index => "index",
            View::Menu => "menu",
            View::StudentList => "student-list",
            View::Success => "success",
            View::Error => "error",
            View::TopCStudents => "top-c-students",
            View::MeritList => "merit-list",
            View::GraceMarksForm => "grace-marks-form",
            View::SearchForm => "search-form",
            View::SearchResults => "search-results",
            View::TopStudentsForm => "top-students-form",
            View::TopStudentsResults => "top-students-results",
        }
    }

    fn title(self) -> &'static str {
        match self {
            View::Index => "Student Records",
            View::Menu => "Menu",
            View::StudentList => "All Students",
            View::Success => "Success",
            View::Error => "Error",
            View::TopCStudents => "Top C Students",
            View::MeritList => "Merit List",
            View::GraceMarksForm => "Apply Grace Marks",
            View::SearchForm => "Search Student",
            View::SearchResults => "Search Results",
            View::TopStudentsForm => "Top Students",
            View::TopStudentsResults => "Top Students",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewModel {
    Students {
        students: Vec<StudentRecord>,
        #[serde(skip_serializing_if = "Option::is_none")]
        subject: Option<Subject>,
    },
    Message {
        msg: String,
    },
    Error {
        error: String,
    },
    Lookup {
        student: Option<StudentRecord>,
        rollno: i64,
    },
    Empty {},
}

impl ViewModel {
    pub fn students(students: Vec<StudentRecord>) -> Self {
        ViewModel::Students {
            students,
            subject: None,
        }
    }

    pub fn message(msg: impl Into<String>) -> Self {
        ViewModel::Message { msg: msg.into() }
    }

    pub fn error(error: impl Into<String>) -> Self {
        ViewModel::Error {
            error: error.into(),
        }
    }
}

pub fn render(view: View, model: &ViewModel) -> String {
    let mut body = String::new();
    match view {
        View::Index => index_body(&mut body),
        View::Menu => menu_body(&mut body),
        View::GraceMarksForm => grace_form_body(&mut body),
        View::SearchForm => search_form_body(&mut body),
        View::TopStudentsForm => top_students_form_body(&mut body),
        _ => {}
    }
    model_body(view, model, &mut body);
    layout(view, &body)
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Absent marks show as `-`; float noise is trimmed to two decimals.
pub fn format_mark(v: Option<f64>) -> String {
    let Some(v) = v else {
        return "-".to_string();
    };
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn layout(view: View, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n{body}<p><a href=\"/menu\">Back to menu</a></p>\n</body>\n</html>\n",
        title = escape(view.title()),
        body = body
    )
}

fn model_body(view: View, model: &ViewModel, out: &mut String) {
    match model {
        ViewModel::Students { students, subject } => {
            if let Some(subject) = subject {
                let _ = writeln!(out, "<h2>Subject: {}</h2>", escape(subject.label()));
            }
            students_table(view, students, out);
        }
        ViewModel::Message { msg } => {
            let _ = writeln!(out, "<p class=\"msg\">{}</p>", escape(msg));
        }
        ViewModel::Error { error } => {
            let _ = writeln!(out, "<p class=\"error\">{}</p>", escape(error));
        }
        ViewModel::Lookup { student, rollno } => match student {
            Some(s) => student_details(s, out),
            None => {
                let _ = writeln!(out, "<p>No student found with roll number {rollno}.</p>");
            }
        },
        ViewModel::Empty {} => {}
    }
}

fn students_table(view: View, students: &[StudentRecord], out: &mut String) {
    if students.is_empty() {
        out.push_str("<p>No students found.</p>\n");
        return;
    }
    let ranked = matches!(
        view,
        View::MeritList | View::TopCStudents | View::TopStudentsResults
    );
    out.push_str("<table>\n<tr>");
    if ranked {
        out.push_str("<th>Rank</th>");
    }
    out.push_str("<th>Roll No</th><th>Name</th><th>C</th><th>Python</th><th>Java</th><th>Total</th><th>Percentage</th></tr>\n");
    for (i, s) in students.iter().enumerate() {
        out.push_str("<tr>");
        if ranked {
            let _ = write!(out, "<td>{}</td>", i + 1);
        }
        let _ = writeln!(
            out,
            "<td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            s.roll_number.map(|r| r.to_string()).unwrap_or_else(|| "-".into()),
            escape(&s.name),
            format_mark(s.c_marks),
            format_mark(s.python_marks),
            format_mark(s.java_marks),
            format_mark(s.total_marks),
            format_mark(s.percentage),
        );
    }
    out.push_str("</table>\n");
}

fn student_details(s: &StudentRecord, out: &mut String) {
    out.push_str("<dl>\n");
    let roll = s
        .roll_number
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".into());
    let rows = [
        ("Roll No", roll),
        ("Name", escape(&s.name)),
        ("C Marks", format_mark(s.c_marks)),
        ("Python Marks", format_mark(s.python_marks)),
        ("Java Marks", format_mark(s.java_marks)),
        ("Total Marks", format_mark(s.total_marks)),
        ("Percentage", format_mark(s.percentage)),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "<dt>{label}</dt><dd>{value}</dd>");
    }
    out.push_str("</dl>\n");
}

fn index_body(out: &mut String) {
    out.push_str(
        "<form method=\"post\" action=\"/students\">\n\
         <label>Roll No <input type=\"number\" name=\"rollno\"></label>\n\
         <label>Name <input type=\"text\" name=\"name\"></label>\n\
         <label>C Marks <input type=\"number\" name=\"c-marks\"></label>\n\
         <label>Python Marks <input type=\"number\" name=\"python-marks\"></label>\n\
         <label>Java Marks <input type=\"number\" name=\"java-marks\"></label>\n\
         <button type=\"submit\">Add Student</button>\n\
         </form>\n",
    );
}

fn menu_body(out: &mut String) {
    let links = [
        ("/", "Add student"),
        ("/students", "List students"),
        ("/compute-total-marks", "Compute total marks"),
        ("/compute-percentage", "Compute percentage"),
        ("/delete-zero-marks", "Delete students with 0 marks"),
        ("/top-c-students", "Top 3 students in C"),
        ("/merit-list", "Merit list"),
        ("/grace-marks-form", "Apply grace marks"),
        ("/search-form", "Search by roll number"),
        ("/top-students-form", "Top students by subject"),
    ];
    out.push_str("<ul>\n");
    for (href, label) in links {
        let _ = writeln!(out, "<li><a href=\"{href}\">{label}</a></li>");
    }
    out.push_str("</ul>\n");
}

fn subject_options(out: &mut String, selected: Subject) {
    for subject in Subject::ALL {
        let sel = if subject == selected { " selected" } else { "" };
        let _ = writeln!(
            out,
            "<option value=\"{}\"{sel}>{}</option>",
            subject.form_value(),
            subject.label()
        );
    }
}

fn grace_form_body(out: &mut String) {
    out.push_str("<form method=\"post\" action=\"/apply-grace-marks\">\n");
    out.push_str("<label>Grace Marks <input type=\"number\" name=\"graceMarks\"></label>\n");
    out.push_str("<select name=\"subject\">\n");
    subject_options(out, Subject::Java);
    out.push_str("</select>\n<button type=\"submit\">Apply</button>\n</form>\n");
}

fn search_form_body(out: &mut String) {
    out.push_str(
        "<form method=\"get\" action=\"/search\">\n\
         <label>Roll No <input type=\"number\" name=\"rollno\"></label>\n\
         <button type=\"submit\">Search</button>\n\
         </form>\n",
    );
}

fn top_students_form_body(out: &mut String) {
    out.push_str("<form method=\"get\" action=\"/top-students\">\n<select name=\"subject\">\n");
    subject_options(out, Subject::C);
    out.push_str("</select>\n<button type=\"submit\">Show</button>\n</form>\n");
}
