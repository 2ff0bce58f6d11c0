mod http_test;
mod verify_test;
