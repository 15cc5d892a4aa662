/// A macro for creating `xcb::XidNew` objects from a `u32`.
macro_rules! cast {
    ($ctype:ty, $resid:expr) => {
        <$ctype as XidNew>::new($resid)
    };
}

/// A macro for the common pattern off sending a request
/// and then getting the reply from the cookie that gets returned.
///
/// Note that this completely disregards the asynchronous
/// nature of the underlying XCB library.
macro_rules! req_and_reply {
    ($conn:expr, $req:expr) => {
        $conn.wait_for_reply($conn.send_request($req))
    };
}

/// A macro for the common pattern off sending a request
/// and then getting a result from the cookie that gets returned.
///
/// Note that this completely disregards the asynchronous
/// nature of the underlying XCB library.
macro_rules! req_and_check {
    ($conn:expr, $req:expr) => {
        $conn.check_request($conn.send_request_checked($req))
    };
}

pub(super) use {cast, req_and_check, req_and_reply};
