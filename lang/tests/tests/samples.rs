use stride_tests::lib_prog;

lib_prog!(hello);
lib_prog!(arith);
lib_prog!(closure);
lib_prog!(loops);
lib_prog!(pairs);
lib_prog!(curry);
lib_prog!(fib);
lib_prog!(early_return, "early-return");
lib_prog!(import);
