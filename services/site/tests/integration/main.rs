mod helpers;

mod passcode_test;
