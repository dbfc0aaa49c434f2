// every standard status code defined by HTTP 1.1 and its extensions,
// sorted by code so lookups can binary search.
// 305 Use Proxy and 306 Switch Proxy are deprecated and deliberately absent.
const STANDARD_REASONS: [(u16, &str); 61] = [
  (100, "Continue"),
  (101, "Switching Protocols"),
  (102, "Processing"),
  (103, "Early Hints"),
  (200, "OK"),
  (201, "Created"),
  (202, "Accepted"),
  (203, "Non-Authoritative Information"),
  (204, "No Content"),
  (205, "Reset Content"),
  (206, "Partial Content"),
  (207, "Multi-Status"),
  (208, "Already Reported"),
  (226, "IM Used"),
  (300, "Multiple Choices"),
  (301, "Moved Permanently"),
  (302, "Found"),
  (303, "See Other"),
  (304, "Not Modified"),
  (307, "Temporary Redirect"),
  (308, "Permanent Redirect"),
  (400, "Bad Request"),
  (401, "Unauthorized"),
  (402, "Payment Required"),
  (403, "Forbidden"),
  (404, "Not Found"),
  (405, "Method Not Allowed"),
  (406, "Not Acceptable"),
  (407, "Proxy Authentication Required"),
  (408, "Request Timeout"),
  (409, "Conflict"),
  (410, "Gone"),
  (411, "Length Required"),
  (412, "Precondition Failed"),
  (413, "Payload Too Large"),
  (414, "URI Too Long"),
  (415, "Unsupported Media Type"),
  (416, "Range Not Satisfiable"),
  (417, "Expectation Failed"),
  (418, "I'm a teapot"),
  (421, "Misdirected Request"),
  (422, "Unprocessable Entity"),
  (423, "Locked"),
  (424, "Failed Dependency"),
  (425, "Too Early"),
  (426, "Upgrade Required"),
  (428, "Precondition Required"),
  (429, "Too Many Requests"),
  (431, "Request Header Fields Too Large"),
  (451, "Unavailable For Legal Reasons"),
  (500, "Internal Server Error"),
  (501, "Not Implemented"),
  (502, "Bad Gateway"),
  (503, "Service Unavailable"),
  (504, "Gateway Timeout"),
  (505, "HTTP Version Not Supported"),
  (506, "Variant Also Negotiates"),
  (507, "Insufficient Storage"),
  (508, "Loop Detected"),
  (510, "Not Extended"),
  (511, "Network Authentication Required"),
];

pub struct Status {
  pub code: u16,
  pub reason: String,
}

impl Status {
  // reason phrase for a standard status code.
  // an unrecognized code is a normal outcome here, not an error,
  // and it never falls back to some generic "4xx" phrase.
  pub fn describe(code: u16) -> Option<&'static str> {
    STANDARD_REASONS
      .binary_search_by_key(&code, |&(known, _)| known)
      .ok()
      .map(|index| STANDARD_REASONS[index].1)
  }

  // this is only for standard status codes.
  // if you want a custom status, use `custom` and bring your own reason.
  pub fn from_code(code: u16) -> Option<Status> {
    Status::describe(code).map(|reason| Status {
      code: code,
      reason: reason.to_owned(),
    })
  }

  pub fn custom(code: u16, reason: String) -> Status {
    Status {
      code: code,
      reason: reason,
    }
  }

  // every standard status, ascending by code
  pub fn standard() -> impl Iterator<Item = Status> {
    STANDARD_REASONS.iter().map(|&(code, reason)| Status {
      code: code,
      reason: reason.to_owned(),
    })
  }

  // the statuses the server machinery reaches for directly
  pub fn ok() -> Status {
    Status::expect_standard(200)
  }

  pub fn partial_content() -> Status {
    Status::expect_standard(206)
  }

  pub fn bad_request() -> Status {
    Status::expect_standard(400)
  }

  pub fn not_found() -> Status {
    Status::expect_standard(404)
  }

  pub fn range_not_satisfiable() -> Status {
    Status::expect_standard(416)
  }

  pub fn internal_server_error() -> Status {
    Status::expect_standard(500)
  }

  pub fn not_implemented() -> Status {
    Status::expect_standard(501)
  }

  fn expect_standard(code: u16) -> Status {
    match Status::from_code(code) {
      Some(status) => status,
      // the named constructors only pass codes present in the table
      None => Status::custom(code, String::new()),
    }
  }
}
